//! AI tag lookup against the tag endpoint.

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use skugeo_core::AiTags;

use super::{error_body, retry_after_secs, CatalogClient, TAG_PRODUCT_ID_PREFIX};
use crate::error::ScraperError;
use crate::retry::retry_with_backoff;
use crate::types::TagResponse;

impl CatalogClient {
    /// Fetches the AI classification tags for one product.
    ///
    /// The identity is sent as `zara-new_<identity>`. Returns `Ok(None)` when
    /// the service answers but has no tags for the product (any envelope
    /// other than `code == 0` with a `data` object).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::TagStatus`]: any non-2xx status other than 429.
    /// - [`ScraperError::RateLimited`]: HTTP 429. Not retried.
    /// - [`ScraperError::Http`]: network failure or timeout after all retries.
    /// - [`ScraperError::Deserialize`]: body is not JSON.
    pub async fn fetch_tag_info(&self, identity: &str) -> Result<Option<AiTags>, ScraperError> {
        let wire_id = format!("{TAG_PRODUCT_ID_PREFIX}{identity}");
        let wire_id = wire_id.as_str();

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(self.tag_url.clone())
                .query(&[("productId", wire_id)])
                .header(AUTHORIZATION, &self.tag_token)
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ScraperError::RateLimited {
                    endpoint: self.tag_url.to_string(),
                    retry_after_secs: retry_after_secs(&response),
                });
            }

            if !status.is_success() {
                return Err(ScraperError::TagStatus {
                    identity: identity.to_owned(),
                    status: status.as_u16(),
                    body: error_body(response).await,
                });
            }

            let text = response.text().await?;
            let parsed =
                serde_json::from_str::<TagResponse>(&text).map_err(|e| ScraperError::Deserialize {
                    context: format!("tag info for product {identity}"),
                    source: e,
                })?;
            Ok(parsed.into_tags())
        })
        .await
    }
}
