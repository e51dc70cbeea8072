//! Output module for reporting crawl results
//!
//! This module handles:
//! - Streaming discovered items to the console as they are found
//! - Saving the final results as JSON

mod console;
mod json;
mod traits;

pub use console::ConsoleEmitter;
pub use json::save_results;
pub use traits::{Emitter, OutputError, OutputResult, RecordingEmitter, Tag};
