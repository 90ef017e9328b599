pub mod app_config;
pub mod config;
pub mod gender;
pub mod products;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_OUTPUT_PATH};
pub use gender::GenderCategory;
pub use products::{AiTags, Batch, PriceValue, Product};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
