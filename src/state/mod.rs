//! State module for tracking what a crawl session has seen and found
//!
//! # Components
//!
//! - `DedupStore`: concurrent at-most-once set for URLs and bucket names
//! - `Results`: the discovered URLs and buckets returned by a session
//! - `ResultsSink`: the thread-safe accumulator a session appends to

mod dedup;
mod results;

// Re-export main types
pub use dedup::DedupStore;
pub use results::{Results, ResultsSink};
