//! Capabilities the acquisition pipeline depends on.
//!
//! [`CatalogClient`] implements both over HTTP. Tests and alternative
//! backends plug in by implementing the traits directly.

use async_trait::async_trait;
use skugeo_core::{AiTags, GenderCategory};

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::types::SearchPage;

/// Keyword search returning one page of raw rows.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    async fn search(
        &self,
        keyword: &str,
        gender: GenderCategory,
        page_size: u32,
    ) -> Result<SearchPage, ScraperError>;
}

/// Best-effort AI tag lookup for one product identity.
///
/// `Ok(None)` means the service has no tags for the product; `Err` means
/// the lookup itself failed.
#[async_trait]
pub trait TagLookup: Send + Sync {
    async fn fetch_tags(&self, identity: &str) -> Result<Option<AiTags>, ScraperError>;
}

#[async_trait]
impl ProductSearch for CatalogClient {
    async fn search(
        &self,
        keyword: &str,
        gender: GenderCategory,
        page_size: u32,
    ) -> Result<SearchPage, ScraperError> {
        self.search_products(keyword, gender, page_size).await
    }
}

#[async_trait]
impl TagLookup for CatalogClient {
    async fn fetch_tags(&self, identity: &str) -> Result<Option<AiTags>, ScraperError> {
        self.fetch_tag_info(identity).await
    }
}
