pub mod client;
pub mod dedup;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub(crate) mod retry;
pub mod source;
pub mod types;

pub use client::{CatalogClient, CatalogConfig};
pub use dedup::DedupAccumulator;
pub use error::ScraperError;
pub use normalize::normalize_product;
pub use pipeline::{
    AcquisitionPipeline, AcquisitionRun, EnrichmentFailure, KeywordOutcome, KeywordStatus,
    RunReport,
};
pub use source::{ProductSearch, TagLookup};
pub use types::{RawProduct, SearchPage};
