//! Paper fetchers for archive building.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use super::FileFetcher;
use crate::http::{FetchError, FetchedBody, HttpClient, join_site_path};

/// Fetches papers over HTTP relative to the site base URL.
#[derive(Debug, Clone)]
pub struct HttpFileFetcher {
    http: HttpClient,
    base_url: Url,
}

impl HttpFileFetcher {
    #[must_use]
    pub fn new(http: HttpClient, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedBody, FetchError> {
        let url = join_site_path(&self.base_url, path)?;
        self.http.get_bytes(&url, false).await
    }
}

/// Reads papers from a site checkout on disk.
///
/// A missing file answers with status 404 rather than an error, mirroring
/// what a static file server would do.
#[derive(Debug, Clone)]
pub struct LocalFileFetcher {
    root: PathBuf,
}

impl LocalFileFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a root-relative site path onto the checkout, refusing `..`.
    fn local_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl FileFetcher for LocalFileFetcher {
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, path: &str) -> Result<FetchedBody, FetchError> {
        let Some(local) = self.local_path(path) else {
            return Err(FetchError::invalid_url(path));
        };
        match tokio::fs::read(&local).await {
            Ok(bytes) => Ok(FetchedBody { status: 200, bytes }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(FetchedBody {
                status: 404,
                bytes: Vec::new(),
            }),
            Err(error) => Err(FetchError::io(local.display().to_string(), error)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_fetcher_reads_relative_to_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("papers/phy")).unwrap();
        std::fs::write(dir.path().join("papers/phy/p1.pdf"), b"%PDF-1.4").unwrap();

        let fetcher = LocalFileFetcher::new(dir.path());
        let body = fetcher.fetch("/papers/phy/p1.pdf").await.unwrap();
        assert_eq!(body.status, 200);
        assert_eq!(body.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_local_fetcher_missing_file_is_404() {
        let dir = tempfile::TempDir::new().unwrap();
        let body = LocalFileFetcher::new(dir.path())
            .fetch("papers/none.pdf")
            .await
            .unwrap();
        assert_eq!(body.status, 404);
    }

    #[tokio::test]
    async fn test_local_fetcher_rejects_parent_components() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = LocalFileFetcher::new(dir.path())
            .fetch("papers/../../etc/passwd")
            .await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
