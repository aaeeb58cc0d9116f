//! Progress bar for archive bundling.

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use pastpapers_core::archive::FileFetcher;
use pastpapers_core::http::{FetchError, FetchedBody};

/// Creates the bundling bar when requested; `None` keeps output silent.
pub(crate) fn bundle_progress(use_progress: bool, total: usize) -> Option<ProgressBar> {
    if !use_progress {
        return None;
    }
    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

/// Fetcher wrapper that advances a progress bar once per fetched file.
pub(crate) struct ProgressFetcher<F> {
    inner: F,
    bar: Option<ProgressBar>,
}

impl<F> ProgressFetcher<F> {
    pub(crate) fn new(inner: F, bar: Option<ProgressBar>) -> Self {
        Self { inner, bar }
    }
}

#[async_trait]
impl<F: FileFetcher> FileFetcher for ProgressFetcher<F> {
    async fn fetch(&self, path: &str) -> Result<FetchedBody, FetchError> {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("Fetching {path}..."));
        }
        let result = self.inner.fetch(path).await;
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct StaticFetcher;

    #[async_trait]
    impl FileFetcher for StaticFetcher {
        async fn fetch(&self, path: &str) -> Result<FetchedBody, FetchError> {
            if path == "/missing.pdf" {
                return Err(FetchError::invalid_url(path));
            }
            Ok(FetchedBody {
                status: 200,
                bytes: path.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn test_bundle_progress_disabled_returns_none() {
        assert!(bundle_progress(false, 3).is_none());
    }

    #[tokio::test]
    async fn test_progress_fetcher_advances_on_success_and_failure() {
        let bar = ProgressBar::hidden();
        bar.set_length(2);
        let fetcher = ProgressFetcher::new(StaticFetcher, Some(bar.clone()));

        let body = fetcher.fetch("/a.pdf").await.unwrap();
        assert_eq!(body.bytes, b"/a.pdf");
        assert!(fetcher.fetch("/missing.pdf").await.is_err());
        assert_eq!(bar.position(), 2);
    }

    #[tokio::test]
    async fn test_progress_fetcher_without_bar_passes_through() {
        let fetcher = ProgressFetcher::new(StaticFetcher, None);
        let body = fetcher.fetch("/b.pdf").await.unwrap();
        assert_eq!(body.status, 200);
    }
}
