//! Keyword-driven product acquisition.
//!
//! One run walks the caller's keywords in order: search, decode and normalize
//! each row, drop duplicates (first keyword wins), enrich the survivors with
//! AI tags, and assemble a [`Batch`]. Per-keyword and per-product failures
//! are recorded in the [`RunReport`] and never abort the run.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use skugeo_core::{AiTags, Batch, GenderCategory, Product};

use crate::dedup::DedupAccumulator;
use crate::error::ScraperError;
use crate::normalize::normalize_product;
use crate::source::{ProductSearch, TagLookup};
use crate::types::{RawProduct, SearchPage};

/// Outcome of one keyword's search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordStatus {
    /// The search succeeded; `rows` were returned and `admitted` of them
    /// entered the batch.
    Searched { rows: usize, admitted: usize },
    /// The search call failed; no rows from this keyword were used.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordOutcome {
    pub keyword: String,
    pub status: KeywordStatus,
}

/// A product kept in the batch without tags because the lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub identity: String,
    pub keyword: String,
    pub error: String,
}

/// Diagnostics for one run, in keyword order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub keywords: Vec<KeywordOutcome>,
    pub enrichment_failures: Vec<EnrichmentFailure>,
    /// Rows whose identity was already admitted earlier in the run.
    pub duplicates_skipped: usize,
    /// Rows that did not decode or had no identity.
    pub malformed_rows: usize,
    /// Products whose tag lookup succeeded but returned no tags.
    pub untagged: usize,
}

impl RunReport {
    pub fn keyword_failures(&self) -> impl Iterator<Item = &KeywordOutcome> {
        self.keywords
            .iter()
            .filter(|k| matches!(k.status, KeywordStatus::Failed { .. }))
    }

    #[must_use]
    pub fn keyword_failure_count(&self) -> usize {
        self.keyword_failures().count()
    }

    #[must_use]
    pub fn enrichment_failure_count(&self) -> usize {
        self.enrichment_failures.len()
    }
}

/// Result of [`AcquisitionPipeline::run`].
#[derive(Debug, Clone)]
pub struct AcquisitionRun {
    pub batch: Batch,
    pub report: RunReport,
}

/// What happened to a single search row before enrichment.
enum RowDisposition {
    Admitted(Product),
    DuplicateSkipped,
    Malformed,
}

/// Orchestrates search, normalization, dedup and enrichment.
///
/// Generic over the search and tag capabilities so the same orchestration
/// runs against [`crate::CatalogClient`] or any other implementation.
///
/// Up to `max_concurrent_requests` searches (and later, tag lookups) are in
/// flight at once. Results are consumed in input order and admission is a
/// single sequential pass, so which duplicate survives never depends on
/// response timing.
pub struct AcquisitionPipeline<'a, S, T> {
    search: &'a S,
    tags: &'a T,
    max_concurrent_requests: usize,
}

impl<'a, S, T> AcquisitionPipeline<'a, S, T>
where
    S: ProductSearch,
    T: TagLookup,
{
    #[must_use]
    pub fn new(search: &'a S, tags: &'a T) -> Self {
        Self {
            search,
            tags,
            max_concurrent_requests: 1,
        }
    }

    /// Sets the request fan-out. `0` is treated as `1`.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests.max(1);
        self
    }

    /// Runs every keyword and returns the assembled batch with its report.
    ///
    /// Never fails: a failed search marks that keyword as failed, a failed
    /// tag lookup leaves the product untagged. `captured_at` is the
    /// completion time.
    pub async fn run(
        &self,
        keywords: &[String],
        gender: GenderCategory,
        per_keyword_limit: u32,
    ) -> AcquisitionRun {
        let mut report = RunReport::default();
        let mut seen = DedupAccumulator::new();
        let mut admitted: Vec<Product> = Vec::new();

        for (keyword, result) in self.search_all(keywords, gender, per_keyword_limit).await {
            match result {
                Ok(page) => {
                    let (rows, kept) =
                        Self::admit_page(page, keyword, &mut seen, &mut admitted, &mut report);
                    tracing::info!(keyword, rows, admitted = kept, "keyword searched");
                    report.keywords.push(KeywordOutcome {
                        keyword: keyword.to_owned(),
                        status: KeywordStatus::Searched {
                            rows,
                            admitted: kept,
                        },
                    });
                }
                Err(e) => {
                    tracing::warn!(keyword, error = %e, "search failed, skipping keyword");
                    report.keywords.push(KeywordOutcome {
                        keyword: keyword.to_owned(),
                        status: KeywordStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        let products = self.enrich_all(admitted, &mut report).await;
        let batch = Batch::new(Utc::now(), products);

        tracing::info!(
            products = batch.count(),
            keyword_failures = report.keyword_failure_count(),
            enrichment_failures = report.enrichment_failure_count(),
            duplicates_skipped = report.duplicates_skipped,
            malformed_rows = report.malformed_rows,
            "acquisition run complete"
        );

        AcquisitionRun { batch, report }
    }

    /// Issues one search per keyword, returning results in keyword order.
    async fn search_all<'k>(
        &self,
        keywords: &'k [String],
        gender: GenderCategory,
        page_size: u32,
    ) -> Vec<(&'k str, Result<SearchPage, ScraperError>)> {
        stream::iter(keywords)
            .map(|keyword| async move {
                tracing::debug!(keyword = %keyword, %gender, page_size, "searching");
                let result = self.search.search(keyword, gender, page_size).await;
                (keyword.as_str(), result)
            })
            .buffered(self.max_concurrent_requests)
            .collect()
            .await
    }

    /// Runs every row of a successful page through decode → normalize →
    /// admit. Returns `(rows, admitted)` counts.
    fn admit_page(
        page: SearchPage,
        keyword: &str,
        seen: &mut DedupAccumulator,
        admitted: &mut Vec<Product>,
        report: &mut RunReport,
    ) -> (usize, usize) {
        if !page.is_success() {
            tracing::warn!(
                keyword,
                code = ?page.code,
                msg = page.msg.as_deref().unwrap_or(""),
                "search envelope has no rows"
            );
        }

        let rows = page.into_rows();
        let row_count = rows.len();
        let mut kept = 0usize;

        for row in rows {
            match Self::admit_row(row, keyword, seen) {
                RowDisposition::Admitted(product) => {
                    admitted.push(product);
                    kept += 1;
                }
                RowDisposition::DuplicateSkipped => report.duplicates_skipped += 1,
                RowDisposition::Malformed => report.malformed_rows += 1,
            }
        }

        (row_count, kept)
    }

    fn admit_row(row: Value, keyword: &str, seen: &mut DedupAccumulator) -> RowDisposition {
        let raw = match RawProduct::from_row(row) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(keyword, error = %e, "skipping undecodable search row");
                return RowDisposition::Malformed;
            }
        };

        let product = normalize_product(&raw, keyword);
        if product.identity.is_empty() {
            tracing::warn!(
                keyword,
                name = %product.name,
                "skipping search row without spuId or productId"
            );
            return RowDisposition::Malformed;
        }

        if !seen.admit(&product.identity) {
            tracing::debug!(keyword, identity = %product.identity, "duplicate product skipped");
            return RowDisposition::DuplicateSkipped;
        }

        RowDisposition::Admitted(product)
    }

    /// Attaches AI tags to each admitted product, preserving order.
    async fn enrich_all(&self, admitted: Vec<Product>, report: &mut RunReport) -> Vec<Product> {
        let lookups: Vec<(Product, Result<Option<AiTags>, ScraperError>)> =
            stream::iter(admitted)
                .map(|product| async move {
                    let result = self.tags.fetch_tags(&product.identity).await;
                    (product, result)
                })
                .buffered(self.max_concurrent_requests)
                .collect()
                .await;

        lookups
            .into_iter()
            .map(|(mut product, result)| {
                match result {
                    Ok(Some(tags)) => {
                        tracing::debug!(identity = %product.identity, "AI tags attached");
                        product.ai_tags = Some(tags);
                    }
                    Ok(None) => {
                        tracing::debug!(identity = %product.identity, "no AI tags available");
                        report.untagged += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            identity = %product.identity,
                            error = %e,
                            "tag lookup failed, keeping product without tags"
                        );
                        report.enrichment_failures.push(EnrichmentFailure {
                            identity: product.identity.clone(),
                            keyword: product.source_keyword.clone(),
                            error: e.to_string(),
                        });
                    }
                }
                product
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
