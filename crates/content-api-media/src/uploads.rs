//! Writes downloaded images into the dated uploads directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::MediaError;

/// Where a file ended up on disk and how it is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Public URL under the uploads base URL.
    pub url: String,
    /// File name after collision suffixing.
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct Uploads {
    dir: PathBuf,
    base_url: String,
}

impl Uploads {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether `url` already points into this uploads directory.
    #[must_use]
    pub fn is_local(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Write `bytes` to `<dir>/YYYY/MM/<file_name>`. If the name is taken,
    /// `-1`, `-2`, ... is inserted before the extension.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] when the directory or file cannot be written.
    pub async fn store(
        &self,
        file_name: &str,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<StoredFile, MediaError> {
        let subdir = format!("{:04}/{:02}", now.year(), now.month());
        let dir = self.dir.join(&subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| io_error(&dir, source))?;

        let mut attempt = 0u32;
        loop {
            let candidate = suffixed(file_name, attempt);
            let path = dir.join(&candidate);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .await
                        .map_err(|source| io_error(&path, source))?;
                    file.flush()
                        .await
                        .map_err(|source| io_error(&path, source))?;
                    let url = format!("{}/{subdir}/{candidate}", self.base_url);
                    tracing::info!(path = %path.display(), url = %url, "upload stored");
                    return Ok(StoredFile {
                        path,
                        url,
                        file_name: candidate,
                    });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => return Err(io_error(&path, source)),
            }
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> MediaError {
    MediaError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn suffixed(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_owned();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{attempt}.{ext}"),
        _ => format!("{file_name}-{attempt}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn october() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(suffixed("a.png", 0), "a.png");
        assert_eq!(suffixed("a.png", 2), "a-2.png");
        assert_eq!(suffixed("archive.tar.gz", 1), "archive.tar-1.gz");
        assert_eq!(suffixed("noext", 1), "noext-1");
    }

    #[test]
    fn local_urls_are_recognised() {
        let uploads = Uploads::new("/tmp/u", "https://shop.example.com/uploads/");
        assert!(uploads.is_local("https://shop.example.com/uploads/2026/10/a.png"));
        assert!(!uploads.is_local("https://shop.example.com/uploads-old/a.png"));
        assert!(!uploads.is_local("https://cdn.example.com/a.png"));
    }

    #[tokio::test]
    async fn store_writes_dated_path_and_suffixes_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), "http://localhost:3000/uploads");

        let first = uploads.store("a.png", b"one", october()).await.unwrap();
        let second = uploads.store("a.png", b"two", october()).await.unwrap();

        assert_eq!(first.url, "http://localhost:3000/uploads/2026/10/a.png");
        assert_eq!(second.url, "http://localhost:3000/uploads/2026/10/a-1.png");
        assert_eq!(second.file_name, "a-1.png");
        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
        assert!(first.path.starts_with(dir.path().join("2026/10")));
    }
}
