use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {endpoint} (retry after {retry_after_secs}s)")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error("search for keyword \"{keyword}\" failed with HTTP {status}: {body}")]
    SearchStatus {
        keyword: String,
        status: u16,
        body: String,
    },

    #[error("tag lookup for product {identity} failed with HTTP {status}: {body}")]
    TagStatus {
        identity: String,
        status: u16,
        body: String,
    },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
