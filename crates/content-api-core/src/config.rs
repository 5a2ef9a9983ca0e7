use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here so tests can drive them with a plain
/// `HashMap` lookup instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(
                var,
                "expected one of true/false/1/0/yes/no/on/off".to_string(),
            )
        })
    };

    let env = parse_environment(&or_default("CONTENT_API_ENV", "development"));
    let bind_addr = parse_addr("CONTENT_API_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CONTENT_API_LOG_LEVEL", "info");

    let api_token = lookup("CONTENT_API_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if api_token.is_none() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar("CONTENT_API_TOKEN".to_string()));
    }

    let site_url = trim_base_url(&or_default("CONTENT_API_SITE_URL", "http://localhost:3000"));
    validate_base_url("CONTENT_API_SITE_URL", &site_url)?;
    let uploads_url = trim_base_url(
        &lookup("CONTENT_API_UPLOADS_URL").unwrap_or_else(|_| format!("{site_url}/uploads")),
    );
    validate_base_url("CONTENT_API_UPLOADS_URL", &uploads_url)?;

    let uploads_dir = PathBuf::from(or_default("CONTENT_API_UPLOADS_DIR", "./uploads"));
    let seed_path = lookup("CONTENT_API_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let media_timeout_secs = parse_u64("CONTENT_API_MEDIA_TIMEOUT_SECS", "30")?;
    let media_user_agent = or_default(
        "CONTENT_API_MEDIA_USER_AGENT",
        "content-api/0.1 (media-sideload)",
    );
    let media_max_retries = parse_u32("CONTENT_API_MEDIA_MAX_RETRIES", "2")?;
    let media_backoff_base_ms = parse_u64("CONTENT_API_MEDIA_BACKOFF_BASE_MS", "500")?;
    let media_max_bytes = parse_usize("CONTENT_API_MEDIA_MAX_BYTES", "10485760")?;

    let allow_attribute_creation = parse_bool("CONTENT_API_ALLOW_ATTRIBUTE_CREATION", "false")?;
    let attributes_cache_ttl_secs = parse_u64("CONTENT_API_ATTRIBUTES_CACHE_TTL_SECS", "86400")?;

    let rate_limit_max_requests = parse_usize("CONTENT_API_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("CONTENT_API_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "CONTENT_API_RATE_LIMIT_WINDOW_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_token,
        site_url,
        uploads_url,
        uploads_dir,
        seed_path,
        media_timeout_secs,
        media_user_agent,
        media_max_retries,
        media_backoff_base_ms,
        media_max_bytes,
        allow_attribute_creation,
        attributes_cache_ttl_secs,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn trim_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn validate_base_url(var: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
