//! Error types for index loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::FetchError;

/// Errors that can occur while loading the index document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The index URL uses a scheme the HTTP client cannot fetch from.
    #[error(
        "the index cannot be fetched from a {scheme}:// location ({url}); serve the site over HTTP \
         (e.g. `python -m http.server -d frontend 8000`) or load it with --site-dir"
    )]
    ProtocolUnsupported {
        /// Offending URL scheme.
        scheme: String,
        /// Full index URL.
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("failed to load index.json (HTTP {status})")]
    HttpError {
        /// Index URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The document is not shaped like `{ "subjects": [...] }`.
    #[error("index.json schema mismatch: {detail}")]
    SchemaError {
        /// What was wrong with the document.
        detail: String,
    },

    /// The request failed before a response arrived.
    #[error("{source}")]
    Network {
        #[source]
        source: FetchError,
    },

    /// A local index file could not be read.
    #[error("failed to read index file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Creates a schema error.
    pub fn schema(detail: impl Into<String>) -> Self {
        Self::SchemaError {
            detail: detail.into(),
        }
    }

    /// Maps a fetch failure onto the load taxonomy.
    #[must_use]
    pub fn from_fetch(error: FetchError) -> Self {
        match error {
            FetchError::HttpStatus { url, status } => Self::HttpError { url, status },
            other => Self::Network { source: other },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_maps_to_http_error() {
        let error = LoadError::from_fetch(FetchError::http_status("https://x/index.json", 503));
        assert!(matches!(error, LoadError::HttpError { status: 503, .. }));
        assert_eq!(error.to_string(), "failed to load index.json (HTTP 503)");
    }

    #[test]
    fn test_other_fetch_errors_map_to_network() {
        let error = LoadError::from_fetch(FetchError::invalid_url("::"));
        assert!(matches!(error, LoadError::Network { .. }));
    }

    #[test]
    fn test_protocol_unsupported_display_suggests_http() {
        let error = LoadError::ProtocolUnsupported {
            scheme: "file".to_string(),
            url: "file:///srv/index.json".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("file://"), "Expected scheme in: {msg}");
        assert!(msg.contains("http.server"), "Expected HTTP hint in: {msg}");
    }
}
