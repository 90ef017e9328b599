use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub search_api_url: String,
    pub tag_api_url: String,
    /// Full `Authorization` header value for the search endpoint.
    pub search_token: String,
    /// Full `Authorization` header value for the tag endpoint.
    pub tag_token: String,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub max_concurrent_requests: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("search_api_url", &self.search_api_url)
            .field("tag_api_url", &self.tag_api_url)
            .field("search_token", &"[redacted]")
            .field("tag_token", &"[redacted]")
            .field("output_path", &self.output_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}
