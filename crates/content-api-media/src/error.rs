use thiserror::Error;

/// Errors returned while downloading or storing a sideloaded image.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid image URL '{0}'")]
    InvalidUrl(String),

    /// Non-success status from the image host.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not an image (content-type '{content_type}')")]
    NotAnImage { url: String, content_type: String },

    #[error("{url} exceeds the {limit} byte download limit")]
    TooLarge { url: String, limit: usize },

    #[error("failed to write upload {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
