//! Error types for archive building.

use thiserror::Error;

/// Errors that abort an archive build.
///
/// Individual files that cannot be fetched are not errors; they are skipped
/// and reported in [`super::ArchiveOutcome::skipped`].
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No archive format or save target was configured.
    #[error("archive support is unavailable: no {capability} configured")]
    CapabilityUnavailable { capability: &'static str },

    /// Serializing or saving the archive failed.
    #[error("failed to build archive {filename}: {reason}")]
    ArchiveFailure { filename: String, reason: String },
}

impl ArchiveError {
    /// Creates a capability error.
    #[must_use]
    pub fn unavailable(capability: &'static str) -> Self {
        Self::CapabilityUnavailable { capability }
    }

    /// Creates an archive failure from any displayable cause.
    pub fn failure(filename: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ArchiveFailure {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }
}
