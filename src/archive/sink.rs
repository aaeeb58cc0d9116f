//! Save targets for finished archives.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

use super::{ArchiveError, ArchiveSink};

/// Upper bound on `_N` suffixes tried before giving up.
const MAX_SUFFIX: usize = 1000;

/// Writes archives into a directory without overwriting existing files.
///
/// When `phy_2020.zip` already exists the archive is saved as
/// `phy_2020_1.zip`, then `phy_2020_2.zip`, and so on.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArchiveSink for DirectorySink {
    #[instrument(skip(self, blob), fields(dir = %self.dir.display(), bytes = blob.len()))]
    async fn save(&self, filename: &str, blob: Vec<u8>) -> Result<String, ArchiveError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|error| ArchiveError::failure(filename, error))?;

        let safe_name = sanitize_archive_name(filename);
        let (stem, ext) = match safe_name.rfind('.') {
            Some(pos) if pos > 0 => (&safe_name[..pos], &safe_name[pos..]),
            _ => (safe_name.as_str(), ""),
        };

        for attempt in 0..MAX_SUFFIX {
            let candidate = if attempt == 0 {
                self.dir.join(&safe_name)
            } else {
                self.dir.join(format!("{stem}_{attempt}{ext}"))
            };

            // create_new makes the existence check and the create atomic.
            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => file,
                Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(error) => return Err(ArchiveError::failure(filename, error)),
            };

            write_or_discard(&candidate, file, &blob)
                .await
                .map_err(|error| ArchiveError::failure(filename, error))?;
            debug!(path = %candidate.display(), "archive saved");
            return Ok(candidate.display().to_string());
        }

        Err(ArchiveError::failure(
            filename,
            format!("no free file name in {}", self.dir.display()),
        ))
    }
}

/// Writes `blob` to a freshly reserved file, removing the file again when the
/// write fails so a truncated archive never keeps the name.
async fn write_or_discard<W>(candidate: &Path, mut writer: W, blob: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written: std::io::Result<()> = async {
        writer.write_all(blob).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(error) = written {
        if let Err(cleanup) = tokio::fs::remove_file(candidate).await {
            warn!(
                path = %candidate.display(),
                error = %cleanup,
                "Failed to remove partial archive"
            );
        }
        return Err(error);
    }
    Ok(())
}

/// Replaces path separators and control characters so the name stays
/// inside the output directory.
fn sanitize_archive_name(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "papers.zip".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_sanitize_archive_name() {
        assert_eq!(sanitize_archive_name("phy_2020.zip"), "phy_2020.zip");
        assert_eq!(sanitize_archive_name("a/b_2020.zip"), "a_b_2020.zip");
        assert_eq!(sanitize_archive_name("../.."), "papers.zip");
    }

    #[tokio::test]
    async fn test_directory_sink_does_not_clobber() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path());

        let first = sink.save("phy_2020.zip", b"first".to_vec()).await.unwrap();
        let second = sink.save("phy_2020.zip", b"second".to_vec()).await.unwrap();

        assert!(first.ends_with("phy_2020.zip"), "got {first}");
        assert!(second.ends_with("phy_2020_1.zip"), "got {second}");
        assert_eq!(std::fs::read(dir.path().join("phy_2020.zip")).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join("phy_2020_1.zip")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_directory_sink_creates_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("out/zips");
        let sink = DirectorySink::new(&nested);
        sink.save("papers_SP.zip", vec![1, 2, 3]).await.unwrap();
        assert!(nested.join("papers_SP.zip").exists());
    }

    #[tokio::test]
    async fn test_failed_write_removes_reserved_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let candidate = dir.path().join("phy_2020.zip");
        std::fs::write(&candidate, b"").unwrap();

        let error = write_or_discard(&candidate, FullDisk, b"zip bytes")
            .await
            .unwrap_err();

        assert!(error.to_string().contains("no space left"));
        assert!(!candidate.exists());

        // The name is free again for the next save.
        let saved = DirectorySink::new(dir.path())
            .save("phy_2020.zip", b"retry".to_vec())
            .await
            .unwrap();
        assert!(saved.ends_with("phy_2020.zip"), "got {saved}");
    }
}
