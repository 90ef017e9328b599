//! Command handlers for `fetch`, `tags` and `show`.
//!
//! Per-keyword and per-product failures are reported and the run carries
//! on; only client construction and persistence abort the command.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use skugeo_core::{AppConfig, GenderCategory, Product};
use skugeo_scraper::{
    AcquisitionPipeline, AcquisitionRun, CatalogClient, CatalogConfig, KeywordStatus,
};
use skugeo_store::JsonBatchStore;

/// Keywords searched when none are given on the command line.
pub(crate) const DEFAULT_KEYWORDS: [&str; 4] = ["春季新款", "外套", "连衣裙", "针织"];

const PREVIEW_LEN: usize = 5;

#[derive(Debug)]
pub(crate) struct FetchRequest {
    pub keywords: Vec<String>,
    pub gender: GenderCategory,
    pub limit: u32,
    pub output: PathBuf,
}

/// Drops blank keywords; falls back to [`DEFAULT_KEYWORDS`] when nothing is left.
pub(crate) fn resolve_keywords(keywords: Vec<String>) -> Vec<String> {
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|k| k.trim().to_owned())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| (*k).to_owned()).collect()
    } else {
        keywords
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::new(&CatalogConfig::from_app_config(config))
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))
}

/// Runs one acquisition and writes the batch to `request.output`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the batch cannot be
/// saved. Search and tag failures are printed, not returned.
pub(crate) async fn run_fetch(config: &AppConfig, request: &FetchRequest) -> anyhow::Result<()> {
    let client = build_client(config)?;

    tracing::info!(
        keywords = request.keywords.len(),
        gender = %request.gender,
        limit = request.limit,
        concurrency = config.max_concurrent_requests,
        "starting acquisition run"
    );

    let run = AcquisitionPipeline::new(&client, &client)
        .with_max_concurrent_requests(config.max_concurrent_requests)
        .run(&request.keywords, request.gender, request.limit)
        .await;

    for outcome in run.report.keyword_failures() {
        if let KeywordStatus::Failed { error } = &outcome.status {
            eprintln!("error: search for \"{}\" failed: {error}", outcome.keyword);
        }
    }
    for failure in &run.report.enrichment_failures {
        eprintln!(
            "warning: no AI tags for {} ({}): {}",
            failure.identity, failure.keyword, failure.error
        );
    }

    print!("{}", render_preview(run.batch.products(), PREVIEW_LEN));
    println!("{}", render_summary(&run));

    let written = JsonBatchStore::new(&request.output)
        .save(&run.batch)
        .await
        .with_context(|| format!("failed to save batch to {}", request.output.display()))?;
    println!("saved {} products to {}", run.batch.count(), written.display());

    Ok(())
}

/// Looks up and prints the AI tags of a single product.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the lookup fails.
pub(crate) async fn run_tags(config: &AppConfig, identity: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    match client
        .fetch_tag_info(identity)
        .await
        .with_context(|| format!("tag lookup for {identity} failed"))?
    {
        Some(tags) => {
            println!("spu:              {identity}");
            println!("main_category:    {}", tags.main_category);
            println!("main_category_ai: {}", tags.main_category_ai);
            println!("white_list:       {}", tags.white_list);
            println!("white_list_ai:    {}", tags.white_list_ai);
        }
        None => println!("no AI tags available for {identity}"),
    }
    Ok(())
}

/// Loads a saved batch and prints its preview.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a batch.
pub(crate) async fn run_show(path: PathBuf) -> anyhow::Result<()> {
    let store = JsonBatchStore::new(path);
    let batch = store
        .load()
        .await
        .with_context(|| format!("failed to load batch from {}", store.path().display()))?;

    println!(
        "batch captured at {} with {} products",
        batch.captured_at().to_rfc3339(),
        batch.count()
    );
    print!("{}", render_preview(batch.products(), PREVIEW_LEN));
    Ok(())
}

/// Renders the first `limit` products, one block per product.
pub(crate) fn render_preview(products: &[Product], limit: usize) -> String {
    let mut out = String::new();
    for (i, product) in products.iter().take(limit).enumerate() {
        let marker = if product.is_new_arrival() { " [new]" } else { "" };
        let _ = writeln!(
            out,
            "[{}]{marker} {} (spu {})",
            i + 1,
            product.name,
            product.identity
        );
        let _ = writeln!(
            out,
            "    price: {}  keyword: {}  {} tags",
            product.price,
            product.source_keyword,
            product.tags.len()
        );
        match &product.ai_tags {
            Some(tags) => {
                let _ = writeln!(
                    out,
                    "    tags: {} / {}",
                    tags.main_category, tags.main_category_ai
                );
            }
            None => {
                let _ = writeln!(out, "    tags: (none)");
            }
        }
    }
    if products.len() > limit {
        let _ = writeln!(out, "... and {} more", products.len() - limit);
    }
    out
}

pub(crate) fn render_summary(run: &AcquisitionRun) -> String {
    format!(
        "products: {}, keyword failures: {}, enrichment failures: {}, duplicates skipped: {}, malformed rows: {}",
        run.batch.count(),
        run.report.keyword_failure_count(),
        run.report.enrichment_failure_count(),
        run.report.duplicates_skipped,
        run.report.malformed_rows,
    )
}
