//! Zip archive serialization.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{ArchiveEntry, ArchiveError, ArchiveFormat};

/// Deflate-compressed zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipFormat;

impl ArchiveFormat for ZipFormat {
    fn extension(&self) -> &'static str {
        "zip"
    }

    fn pack(&self, filename: &str, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|error| ArchiveError::failure(filename, error))?;
            writer
                .write_all(&entry.bytes)
                .map_err(|error| ArchiveError::failure(filename, error))?;
        }

        let cursor = writer
            .finish()
            .map_err(|error| ArchiveError::failure(filename, error))?;
        Ok(cursor.into_inner())
    }
}
