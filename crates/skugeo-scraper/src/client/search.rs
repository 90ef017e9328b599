//! Keyword search against the catalog search endpoint.

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use skugeo_core::GenderCategory;

use super::{error_body, retry_after_secs, CatalogClient};
use crate::error::ScraperError;
use crate::retry::retry_with_backoff;
use crate::types::{SearchPage, SearchRequest};

impl CatalogClient {
    /// Runs one keyword search and returns the decoded first page.
    ///
    /// Exactly one logical request is made (page 1 of `page_size` rows);
    /// transport failures may be retried according to the client's policy.
    /// The caller extracts rows with [`SearchPage::rows`].
    ///
    /// # Errors
    ///
    /// - [`ScraperError::SearchStatus`]: any non-2xx status other than 429.
    /// - [`ScraperError::RateLimited`]: HTTP 429. Not retried.
    /// - [`ScraperError::Http`]: network failure or timeout after all retries.
    /// - [`ScraperError::Deserialize`]: body is not a search envelope.
    pub async fn search_products(
        &self,
        keyword: &str,
        gender: GenderCategory,
        page_size: u32,
    ) -> Result<SearchPage, ScraperError> {
        let body = SearchRequest::new(keyword, gender, page_size);
        let body = &body;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .post(self.search_url.clone())
                .header(AUTHORIZATION, &self.search_token)
                .json(body)
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ScraperError::RateLimited {
                    endpoint: self.search_url.to_string(),
                    retry_after_secs: retry_after_secs(&response),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::SearchStatus {
                    keyword: keyword.to_owned(),
                    status: status.as_u16(),
                    body: error_body(response).await,
                });
            }

            let text = response.text().await?;
            serde_json::from_str::<SearchPage>(&text).map_err(|e| ScraperError::Deserialize {
                context: format!("search page for keyword \"{keyword}\""),
                source: e,
            })
        })
        .await
    }
}
