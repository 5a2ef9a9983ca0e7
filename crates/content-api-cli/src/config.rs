use clap::Subcommand;
use content_api_core::{load_app_config_from_env, AppConfig};
use serde_json::{json, Value};

/// Sub-commands available under `config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Load configuration from the environment and print it with secrets redacted
    Check,
}

pub(crate) fn run(command: &ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Check => {
            let config = load_app_config_from_env()?;
            if config.api_token.is_none() && !config.is_development() {
                anyhow::bail!("CONTENT_API_TOKEN is required outside development");
            }
            println!("{}", serde_json::to_string_pretty(&describe(&config))?);
        }
    }
    Ok(())
}

/// Printable view of `config`. The bearer token is never shown.
pub(crate) fn describe(config: &AppConfig) -> Value {
    json!({
        "env": config.env.to_string(),
        "bind_addr": config.bind_addr.to_string(),
        "log_level": config.log_level,
        "api_token": config.api_token.as_ref().map(|_| "[redacted]"),
        "site_url": config.site_url,
        "uploads_url": config.uploads_url,
        "uploads_dir": config.uploads_dir.display().to_string(),
        "seed_path": config.seed_path.as_ref().map(|p| p.display().to_string()),
        "media": {
            "timeout_secs": config.media_timeout_secs,
            "user_agent": config.media_user_agent,
            "max_retries": config.media_max_retries,
            "backoff_base_ms": config.media_backoff_base_ms,
            "max_bytes": config.media_max_bytes,
        },
        "allow_attribute_creation": config.allow_attribute_creation,
        "attributes_cache_ttl_secs": config.attributes_cache_ttl_secs,
        "rate_limit": {
            "max_requests": config.rate_limit_max_requests,
            "window_secs": config.rate_limit_window_secs,
        },
    })
}
