//! Bundles the files of one projected year into a single archive.
//!
//! Building is split across three capabilities so each can be swapped out:
//!
//! - [`FileFetcher`] retrieves paper bytes ([`HttpFileFetcher`], [`LocalFileFetcher`])
//! - [`ArchiveFormat`] serializes named entries ([`ZipFormat`])
//! - [`ArchiveSink`] stores the finished blob ([`DirectorySink`])
//!
//! Files are fetched one at a time in projection order. A file that cannot
//! be fetched is logged and skipped; only a missing capability or a failure
//! to serialize/save aborts the build.

mod error;
mod fetch;
mod format;
mod sink;

pub use error::ArchiveError;
pub use fetch::{HttpFileFetcher, LocalFileFetcher};
pub use format::ZipFormat;
pub use sink::DirectorySink;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::http::{FetchError, FetchedBody};
use crate::projection::{ProjectedYear, resolve_file_path};

/// Archive name prefix used when no subject key is known.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "papers";

/// Retrieves the bytes of a paper by its site path.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetches a root-relative site path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the file cannot be retrieved at all.
    async fn fetch(&self, path: &str) -> Result<FetchedBody, FetchError>;
}

/// Serializes named entries into an archive blob.
pub trait ArchiveFormat: Send + Sync {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Packs entries, in order, into one blob.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFailure`] when serialization fails.
    fn pack(&self, filename: &str, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError>;
}

/// Stores a finished archive under a suggested file name.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Saves the blob and returns where it ended up.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveFailure`] when the blob cannot be stored.
    async fn save(&self, filename: &str, blob: Vec<u8>) -> Result<String, ArchiveError>;
}

/// One named file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A file left out of the archive and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub path: String,
    pub reason: String,
}

/// Result of a successful archive build.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutcome {
    /// Suggested archive name, `{subject}_{year}.zip`.
    pub filename: String,
    /// Where the sink stored the archive.
    pub location: String,
    /// Entry names, in archive order.
    pub included: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

/// Builds the suggested archive name for a subject and year.
#[must_use]
pub fn archive_filename(subject_key: Option<&str>, year: &str, extension: &str) -> String {
    let prefix = subject_key
        .filter(|key| !key.is_empty())
        .unwrap_or(DEFAULT_ARCHIVE_PREFIX);
    format!("{prefix}_{year}.{extension}")
}

/// Fetches a projected year's files and saves them as one archive.
pub struct ArchiveBuilder {
    fetcher: Box<dyn FileFetcher>,
    format: Option<Box<dyn ArchiveFormat>>,
    sink: Option<Box<dyn ArchiveSink>>,
}

impl ArchiveBuilder {
    /// Creates a builder with no format or sink configured.
    pub fn new(fetcher: impl FileFetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            format: None,
            sink: None,
        }
    }

    /// Creates a builder producing zip files in `output_dir`.
    pub fn zip_to_directory(
        fetcher: impl FileFetcher + 'static,
        output_dir: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self::new(fetcher)
            .with_format(ZipFormat)
            .with_sink(DirectorySink::new(output_dir))
    }

    #[must_use]
    pub fn with_format(mut self, format: impl ArchiveFormat + 'static) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl ArchiveSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Builds and saves the archive for one projected year.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::CapabilityUnavailable`] before any fetch when the
    ///   format or sink is missing
    /// - [`ArchiveError::ArchiveFailure`] when packing or saving fails
    #[instrument(skip(self, year), fields(year = %year.year, files = year.files.len()))]
    pub async fn build_archive(
        &self,
        subject_key: Option<&str>,
        year: &ProjectedYear,
    ) -> Result<ArchiveOutcome, ArchiveError> {
        let format = self
            .format
            .as_deref()
            .ok_or_else(|| ArchiveError::unavailable("archive format"))?;
        let sink = self
            .sink
            .as_deref()
            .ok_or_else(|| ArchiveError::unavailable("save target"))?;

        let filename = archive_filename(subject_key, &year.year, format.extension());
        let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(year.files.len());
        let mut skipped = Vec::new();

        for file in &year.files {
            let site_path = resolve_file_path(&file.path);
            let skip = |reason: String| SkippedFile {
                name: file.name.clone(),
                path: file.path.clone(),
                reason,
            };

            if file.path.is_empty() {
                warn!(file = %file.name, "Skipping file without a path");
                skipped.push(skip("no path".to_string()));
                continue;
            }

            let body = match self.fetcher.fetch(&site_path).await {
                Ok(body) if (200..300).contains(&body.status) => body,
                Ok(body) => {
                    warn!(
                        file = %file.name,
                        path = %site_path,
                        status = body.status,
                        "Skipping file"
                    );
                    skipped.push(skip(format!("HTTP {}", body.status)));
                    continue;
                }
                Err(error) => {
                    warn!(file = %file.name, path = %site_path, error = %error, "Skipping file");
                    skipped.push(skip(error.to_string()));
                    continue;
                }
            };

            // A repeated name replaces the earlier entry at its original position.
            if let Some(existing) = entries.iter_mut().find(|entry| entry.name == file.name) {
                existing.bytes = body.bytes;
            } else {
                entries.push(ArchiveEntry::new(file.name.clone(), body.bytes));
            }
        }

        let blob = format.pack(&filename, &entries)?;
        let location = sink.save(&filename, blob).await?;
        info!(
            archive = %location,
            included = entries.len(),
            skipped = skipped.len(),
            "Archive saved"
        );

        Ok(ArchiveOutcome {
            filename,
            location,
            included: entries.into_iter().map(|entry| entry.name).collect(),
            skipped,
        })
    }
}
