//! Image sideloading: download a remote image and store it under the
//! uploads directory.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod uploads;

pub use client::{DownloadedImage, MediaClient, MediaConfig};
pub use error::MediaError;
pub use uploads::{StoredFile, Uploads};

use chrono::Utc;

/// Result of a successful sideload, ready to be recorded as a media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideloadedImage {
    pub url: String,
    pub source_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub checksum: String,
}

/// Downloads images and writes them to the uploads directory.
pub struct Sideloader {
    client: MediaClient,
    uploads: Uploads,
}

impl Sideloader {
    #[must_use]
    pub fn new(client: MediaClient, uploads: Uploads) -> Self {
        Self { client, uploads }
    }

    #[must_use]
    pub fn uploads(&self) -> &Uploads {
        &self.uploads
    }

    /// Fetch `url` and store it.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] when the download or the write fails.
    pub async fn sideload(&self, url: &str) -> Result<SideloadedImage, MediaError> {
        let image = self.client.fetch(url).await?;
        let stored = self
            .uploads
            .store(&image.file_name, &image.bytes, Utc::now())
            .await?;
        Ok(SideloadedImage {
            url: stored.url,
            source_url: image.source_url,
            file_name: stored.file_name,
            mime_type: image.mime_type,
            checksum: image.checksum,
        })
    }
}
