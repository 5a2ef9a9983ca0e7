//! HTTP client that downloads remote images for sideloading.

use std::time::Duration;

use content_api_core::AppConfig;
use reqwest::{header, Client, Url};
use sha2::{Digest, Sha256};

use crate::error::MediaError;
use crate::retry::retry_with_backoff;

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub max_bytes: usize,
}

impl MediaConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.media_timeout_secs,
            user_agent: config.media_user_agent.clone(),
            max_retries: config.media_max_retries,
            backoff_base_ms: config.media_backoff_base_ms,
            max_bytes: config.media_max_bytes,
        }
    }
}

/// A fully downloaded image, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    pub source_url: String,
    pub file_name: String,
    pub mime_type: String,
    /// Lowercase hex SHA-256 of `bytes`.
    pub checksum: String,
    pub bytes: Vec<u8>,
}

pub struct MediaClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
    max_bytes: usize,
}

impl MediaClient {
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
            max_bytes: config.max_bytes,
        })
    }

    /// Download `url`, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`MediaError::InvalidUrl`] for anything but an http(s) URL.
    /// - [`MediaError::Status`] for non-2xx responses.
    /// - [`MediaError::NotAnImage`] when the content type is not `image/*`.
    /// - [`MediaError::TooLarge`] when the body exceeds the configured cap.
    /// - [`MediaError::Http`] on network failure.
    pub async fn fetch(&self, url: &str) -> Result<DownloadedImage, MediaError> {
        let parsed = Url::parse(url).map_err(|_| MediaError::InvalidUrl(url.to_owned()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MediaError::InvalidUrl(url.to_owned()));
        }

        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || {
            self.fetch_once(parsed.clone())
        })
        .await
    }

    async fn fetch_once(&self, url: Url) -> Result<DownloadedImage, MediaError> {
        let source_url = url.to_string();
        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                url: source_url,
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_lowercase())
            .unwrap_or_default();
        if !mime_type.starts_with("image/") {
            return Err(MediaError::NotAnImage {
                url: source_url,
                content_type: mime_type,
            });
        }

        let too_large = || MediaError::TooLarge {
            url: source_url.clone(),
            limit: self.max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        let checksum = format!("{:x}", Sha256::digest(&bytes));
        let file_name = file_name_for(&url, &mime_type, &checksum);
        tracing::debug!(url = %source_url, bytes = bytes.len(), file_name = %file_name, "image downloaded");

        Ok(DownloadedImage {
            source_url,
            file_name,
            mime_type,
            checksum,
            bytes,
        })
    }
}

/// Last path segment of `url` reduced to `[a-z0-9._-]`. Falls back to a
/// checksum prefix plus an extension derived from `mime_type`.
pub(crate) fn file_name_for(url: &Url, mime_type: &str, checksum: &str) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let cleaned: String = segment
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();

    let has_stem_and_ext = cleaned
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty());
    if has_stem_and_ext {
        return cleaned;
    }

    let stem = if cleaned.is_empty() {
        checksum.chars().take(16).collect()
    } else {
        cleaned
    };
    format!("{stem}.{}", extension_for(mime_type))
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "img",
    }
}
