mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "skugeo-cli")]
#[command(about = "Keyword product acquisition for the SKU content pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search each keyword, dedup, attach AI tags, and save the batch.
    Fetch {
        /// Search keyword; repeat for several. Defaults to the seasonal set.
        #[arg(long = "keyword", short = 'k')]
        keywords: Vec<String>,
        /// Gender category label (男士, 女士, 儿童, 家居).
        #[arg(long, default_value = "女士")]
        category: String,
        /// Rows requested per keyword.
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
        /// Overrides `SKUGEO_OUTPUT_PATH`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the AI tags the tag service holds for one product.
    Tags { spu: String },
    /// Summarize a previously saved batch.
    Show {
        #[arg(long, env = "SKUGEO_OUTPUT_PATH", default_value = skugeo_core::DEFAULT_OUTPUT_PATH)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            keywords,
            category,
            limit,
            output,
        } => {
            let config = skugeo_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let request = fetch::FetchRequest {
                keywords: fetch::resolve_keywords(keywords),
                gender: skugeo_core::GenderCategory::from_label(&category),
                limit,
                output: output.unwrap_or_else(|| config.output_path.clone()),
            };
            fetch::run_fetch(&config, &request).await?;
        }
        Commands::Tags { spu } => {
            let config = skugeo_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            fetch::run_tags(&config, &spu).await?;
        }
        Commands::Show { path } => {
            init_tracing("info")?;
            fetch::run_show(path).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
