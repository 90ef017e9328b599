use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_SEARCH_API_URL: &str = "https://search.moechat.cn/api/search/mixed";
const DEFAULT_TAG_API_URL: &str = "https://admin.moechat.cn/admin-api/search/product/showTag";

/// Where a batch is written when `SKUGEO_OUTPUT_PATH` is unset.
pub const DEFAULT_OUTPUT_PATH: &str = "./output/zara_products_data.json";

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let search_token = bearer(&require("SKUGEO_SEARCH_TOKEN")?);
    let tag_token = bearer(&require("SKUGEO_TAG_TOKEN")?);

    let log_level = or_default("SKUGEO_LOG_LEVEL", "info");

    let search_api_url = or_default("SKUGEO_SEARCH_API_URL", DEFAULT_SEARCH_API_URL);
    let tag_api_url = or_default("SKUGEO_TAG_API_URL", DEFAULT_TAG_API_URL);
    let output_path = PathBuf::from(or_default("SKUGEO_OUTPUT_PATH", DEFAULT_OUTPUT_PATH));

    let request_timeout_secs = parse_u64("SKUGEO_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SKUGEO_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("SKUGEO_USER_AGENT", "skugeo/0.1 (product-acquisition)");
    let max_retries = parse_u32("SKUGEO_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("SKUGEO_RETRY_BACKOFF_BASE_MS", "500")?;
    let max_concurrent_requests = parse_usize("SKUGEO_MAX_CONCURRENT_REQUESTS", "1")?;

    Ok(AppConfig {
        log_level,
        search_api_url,
        tag_api_url,
        search_token,
        tag_token,
        output_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        max_concurrent_requests,
    })
}

/// Prefixes a raw token with `Bearer ` unless it already carries a scheme.
fn bearer(token: &str) -> String {
    let token = token.trim();
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
