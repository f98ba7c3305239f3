//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Backend settings.
#[derive(Clone, Debug, Args)]
pub struct BackendConfig {
    /// Storefront API base URL
    #[arg(long, env = "SHOPFRONT_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Base URL product and cart images are served from
    #[arg(
        long,
        env = "SHOPFRONT_UPLOAD_BASE_URL",
        default_value = "http://localhost:5000/uploads/categories"
    )]
    pub upload_base_url: String,
}

/// Local storage settings.
#[derive(Clone, Debug, Args)]
pub struct StorageConfig {
    /// File holding the cart and session
    #[arg(long, env = "SHOPFRONT_STORAGE", default_value = "shopfront-storage.json")]
    pub storage_path: PathBuf,
}

/// Logging settings.
#[derive(Clone, Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Shopfront configuration
#[derive(Clone, Debug, Parser)]
#[command(name = "shopfront", about = "Shopfront terminal storefront", long_about = None)]
pub struct AppConfig {
    /// Backend settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
