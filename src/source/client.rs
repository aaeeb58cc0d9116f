//! Index document loaders.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::IndexSource;
use super::error::LoadError;
use crate::catalog::SubjectRecord;
use crate::http::{FetchError, HttpClient, join_site_path};

/// Loads the index over HTTP(S), always revalidating against the network.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: HttpClient,
    index_url: Url,
}

impl IndexClient {
    /// Creates a loader for an absolute index URL.
    #[must_use]
    pub fn new(http: HttpClient, index_url: Url) -> Self {
        Self { http, index_url }
    }

    /// Creates a loader for `index_path` under a site base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the path cannot be joined.
    pub fn for_site(
        http: HttpClient,
        base_url: &Url,
        index_path: &str,
    ) -> Result<Self, FetchError> {
        let index_url = join_site_path(base_url, index_path)?;
        Ok(Self::new(http, index_url))
    }

    #[must_use]
    pub fn index_url(&self) -> &Url {
        &self.index_url
    }
}

#[async_trait]
impl IndexSource for IndexClient {
    #[instrument(skip(self), fields(url = %self.index_url))]
    async fn load(&self) -> Result<Vec<SubjectRecord>, LoadError> {
        let scheme = self.index_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(LoadError::ProtocolUnsupported {
                scheme: scheme.to_string(),
                url: self.index_url.to_string(),
            });
        }

        let body = self
            .http
            .get_bytes(&self.index_url, true)
            .await
            .map_err(LoadError::from_fetch)?;
        let subjects = decode_index(&body.bytes)?;
        info!(subjects = subjects.len(), "Loaded index");
        Ok(subjects)
    }
}

/// Loads the index from a local site checkout.
#[derive(Debug, Clone)]
pub struct LocalIndex {
    path: PathBuf,
}

impl LocalIndex {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IndexSource for LocalIndex {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Vec<SubjectRecord>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        let subjects = decode_index(&bytes)?;
        info!(subjects = subjects.len(), "Loaded index");
        Ok(subjects)
    }
}

/// Decodes an index document body into subject records.
///
/// # Errors
///
/// Returns [`LoadError::SchemaError`] when the body is not JSON or has no
/// `subjects` array. Subject entries that fail to decode are skipped.
pub fn decode_index(bytes: &[u8]) -> Result<Vec<SubjectRecord>, LoadError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|error| LoadError::schema(format!("body is not valid JSON: {error}")))?;

    let entries = match document {
        Value::Object(mut fields) => match fields.remove("subjects") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(LoadError::schema("expected { subjects: [] }")),
        },
        _ => return Err(LoadError::schema("expected { subjects: [] }")),
    };

    let total = entries.len();
    let subjects: Vec<SubjectRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(position, entry)| match serde_json::from_value::<SubjectRecord>(entry) {
                Ok(subject) => Some(subject),
                Err(error) => {
                    warn!(position, error = %error, "Skipping invalid subject entry");
                    None
                }
            },
        )
        .collect();
    debug!(
        count = subjects.len(),
        skipped = total - subjects.len(),
        "decoded index subjects"
    );
    Ok(subjects)
}
