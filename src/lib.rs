//! Sigrawler: a reconnaissance web crawler
//!
//! This crate crawls a site from one or more seed URLs and reports in-scope
//! pages, JavaScript assets, endpoints referenced inside that JavaScript, and
//! leaked S3 bucket references.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sigrawler operations
#[derive(Debug, Error)]
pub enum SigrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Session for {seed} ended abnormally: {message}")]
    Session { seed: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sigrawler operations
pub type Result<T> = std::result::Result<T, SigrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Options;
pub use crawler::{run_batch, BatchReport, Crawler};
pub use state::Results;
pub use self::url::{normalize, Scope, Site};
