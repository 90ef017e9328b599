//! HTTP client for the catalog search and tag endpoints.

mod search;
mod tags;

use std::time::Duration;

use reqwest::{Client, Url};
use skugeo_core::AppConfig;

use crate::error::ScraperError;

/// Upper bound on how much of an error response body is kept in errors and logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Brand namespace the tag backend prefixes onto every product id.
pub const TAG_PRODUCT_ID_PREFIX: &str = "zara-new_";

/// Endpoints, credentials and transport policy for [`CatalogClient`].
///
/// Tokens are complete `Authorization` header values (`"Bearer ..."`).
#[derive(Clone)]
pub struct CatalogConfig {
    pub search_api_url: String,
    pub tag_api_url: String,
    pub search_token: String,
    pub tag_token: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after a transport failure (connect error or timeout).
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl CatalogConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_api_url: config.search_api_url.clone(),
            tag_api_url: config.tag_api_url.clone(),
            search_token: config.search_token.clone(),
            tag_token: config.tag_token.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("search_api_url", &self.search_api_url)
            .field("tag_api_url", &self.tag_api_url)
            .field("search_token", &"[redacted]")
            .field("tag_token", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Client for the catalog search backend and its tag service.
///
/// Non-2xx responses surface as [`ScraperError::SearchStatus`] or
/// [`ScraperError::TagStatus`]; 429s as [`ScraperError::RateLimited`].
/// Every request is bounded by the configured timeout, and timeouts and
/// other transport failures are retried with back-off up to `max_retries`
/// additional attempts.
pub struct CatalogClient {
    client: Client,
    search_url: Url,
    tag_url: Url,
    search_token: String,
    tag_token: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` from endpoint and transport settings.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidEndpoint`] if either endpoint URL does not parse.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(config: &CatalogConfig) -> Result<Self, ScraperError> {
        let search_url = parse_endpoint(&config.search_api_url)?;
        let tag_url = parse_endpoint(&config.tag_api_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            search_url,
            tag_url,
            search_token: config.search_token.clone(),
            tag_token: config.tag_token.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
        })
    }
}

fn parse_endpoint(url: &str) -> Result<Url, ScraperError> {
    Url::parse(url).map_err(|e| ScraperError::InvalidEndpoint {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Reads `Retry-After` as whole seconds, defaulting to 60.
fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Reads the body of a failed response for diagnostics, truncated.
///
/// A body that cannot be read is reported as empty; the status code is the
/// primary signal.
async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    truncate_chars(&body, MAX_ERROR_BODY_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CatalogConfig {
        CatalogConfig {
            search_api_url: "https://search.example.com/api/search/mixed".to_owned(),
            tag_api_url: "https://admin.example.com/search/product/showTag".to_owned(),
            search_token: "Bearer search-secret".to_owned(),
            tag_token: "Bearer tag-secret".to_owned(),
            timeout_secs: 5,
            user_agent: "skugeo-test/0.1".to_owned(),
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    #[test]
    fn new_rejects_invalid_search_url() {
        let mut cfg = config();
        cfg.search_api_url = "not a url".to_owned();
        let err = CatalogClient::new(&cfg).err().expect("expected error");
        assert!(
            matches!(err, ScraperError::InvalidEndpoint { ref url, .. } if url == "not a url"),
            "got: {err:?}"
        );
    }

    #[test]
    fn new_accepts_valid_config() {
        assert!(CatalogClient::new(&config()).is_ok());
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"), "leaked: {rendered}");
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("服务器错误", 3), "服务器…");
        assert_eq!(truncate_chars("ok", 10), "ok");
    }
}
