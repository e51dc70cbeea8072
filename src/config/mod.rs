//! Configuration module for Sigrawler
//!
//! This module holds the crawl `Options`, loads them from TOML files, and
//! validates them.
//!
//! # Example
//!
//! ```no_run
//! use sigrawler::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("sigrawler.toml")).unwrap();
//! println!("Crawler will use max depth: {}", options.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::Options;

// Re-export parser functions
pub use parser::{load_options, parse_options, split_proxies};
pub use validation::validate;
