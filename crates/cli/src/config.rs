//! CLI configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser};
use storefront_app::api::ApiConfig;

use crate::commands::Commands;

/// Storefront command-line client
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the API lives and where local state is kept.
#[derive(Debug, Args)]
pub struct Settings {
    /// Base URL of the storefront API
    #[arg(
        long,
        env = "STOREFRONT_API_URL",
        default_value = "http://localhost:5000/api",
        global = true
    )]
    pub api_url: String,

    /// Directory holding the cart, session cookies and admin token
    #[arg(
        long,
        env = "STOREFRONT_DATA_DIR",
        default_value = ".storefront",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "STOREFRONT_TIMEOUT_SECONDS",
        default_value_t = 10_u64,
        global = true
    )]
    pub timeout_seconds: u64,
}

impl Settings {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}
