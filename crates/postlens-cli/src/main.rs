mod format;
mod query;
mod run;
mod summary;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use postlens_core::{Dataset, Palette};
use tracing_subscriber::EnvFilter;

use crate::run::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "postlens-cli")]
#[command(about = "Search and compare Telegram and Twitter posts from the terminal")]
struct Cli {
    /// Dataset file (JSON array or JSON Lines)
    #[arg(long, global = true, env = "POSTLENS_DATASET_PATH")]
    dataset: Option<PathBuf>,

    /// Platform color palette (YAML or JSON)
    #[arg(long, global = true, env = "POSTLENS_PALETTE_PATH")]
    palette: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true, env = "POSTLENS_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one dashboard pass and print totals, trends and top posts
    Run(RunArgs),
    /// Compile a query and print its canonical form
    CheckQuery {
        /// Boolean query, e.g. `macron AND NOT "pension reform"`
        query: String,
    },
    /// Summarize the dataset: load report, date spans, row counts
    Dataset,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(cli.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(ref args) => {
            let (dataset, _) = load_dataset(cli.dataset.as_deref())?;
            let palette = load_palette(cli.palette.as_deref())?;
            run::run_dashboard(&dataset, &palette, args)?;
        }
        Commands::CheckQuery { ref query } => query::run_check_query(query)?,
        Commands::Dataset => {
            let path = require_dataset_path(cli.dataset.as_deref())?;
            let (dataset, report) = load_dataset(Some(path))?;
            summary::run_dataset_summary(path, &dataset, &report);
        }
    }

    Ok(())
}

fn require_dataset_path(path: Option<&Path>) -> anyhow::Result<&Path> {
    path.ok_or_else(|| {
        anyhow::anyhow!("no dataset given; pass --dataset or set POSTLENS_DATASET_PATH")
    })
}

fn load_dataset(path: Option<&Path>) -> anyhow::Result<(Dataset, postlens_core::LoadReport)> {
    let path = require_dataset_path(path)?;
    postlens_core::load_dataset(path)
        .with_context(|| format!("failed to load dataset {}", path.display()))
}

fn load_palette(path: Option<&Path>) -> anyhow::Result<Palette> {
    match path {
        Some(path) => postlens_core::load_palette(path)
            .with_context(|| format!("failed to load palette {}", path.display())),
        None => Ok(Palette::default()),
    }
}
