use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Settings loaded once at startup and handed to every entry point.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shared bearer token. `None` only makes sense in development.
    pub api_token: Option<String>,
    /// Public site root used to build term links, without trailing slash.
    pub site_url: String,
    /// Public URL of `uploads_dir`, without trailing slash.
    pub uploads_url: String,
    pub uploads_dir: PathBuf,
    pub seed_path: Option<PathBuf>,
    pub media_timeout_secs: u64,
    pub media_user_agent: String,
    pub media_max_retries: u32,
    pub media_backoff_base_ms: u64,
    pub media_max_bytes: usize,
    pub allow_attribute_creation: bool,
    pub attributes_cache_ttl_secs: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("site_url", &self.site_url)
            .field("uploads_url", &self.uploads_url)
            .field("uploads_dir", &self.uploads_dir)
            .field("seed_path", &self.seed_path)
            .field("media_timeout_secs", &self.media_timeout_secs)
            .field("media_user_agent", &self.media_user_agent)
            .field("media_max_retries", &self.media_max_retries)
            .field("media_backoff_base_ms", &self.media_backoff_base_ms)
            .field("media_max_bytes", &self.media_max_bytes)
            .field("allow_attribute_creation", &self.allow_attribute_creation)
            .field("attributes_cache_ttl_secs", &self.attributes_cache_ttl_secs)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
