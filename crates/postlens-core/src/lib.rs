//! Shared data model and configuration for postlens.
//!
//! Holds the strongly-typed [`Post`] record, the read-only [`Dataset`] it is
//! loaded into, the platform color [`Palette`], and the environment-driven
//! [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod dataset;
pub mod palette;
pub mod post;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{load_dataset, parse_dataset, Dataset, DatasetError, LoadReport, SkipReason};
pub use palette::{load_palette, ColorLookup, Palette};
pub use post::{permalink, Platform, Post};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read palette file {path}: {source}")]
    PaletteFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse palette file: {0}")]
    PaletteFileParse(#[from] serde_yaml::Error),
}
