//! Output traits and types
//!
//! Discovered items are reported through an [`Emitter`] as soon as they are
//! recorded. Implementations must be thread-safe: every task of every
//! session emits through the same instance.

use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The kind of a discovered item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A page linked through `href`
    Url,
    /// A resource referenced through `src`
    Javascript,
    /// An endpoint found inside JavaScript
    Linkfinder,
    /// An S3 bucket reference
    S3,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Javascript => "javascript",
            Self::Linkfinder => "linkfinder",
            Self::S3 => "s3",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_str())
    }
}

/// Trait for live item reporting
pub trait Emitter: Send + Sync {
    /// Reports one discovered item
    ///
    /// # Arguments
    ///
    /// * `tag` - What kind of item was found
    /// * `value` - The URL or bucket name
    fn emit(&self, tag: Tag, value: &str);
}

/// Emitter that keeps every item in memory
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    items: Mutex<Vec<(Tag, String)>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every item emitted so far, in emission order
    pub fn items(&self) -> Vec<(Tag, String)> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Returns the values emitted under `tag`
    pub fn values(&self, tag: Tag) -> Vec<String> {
        self.items()
            .into_iter()
            .filter(|(t, _)| *t == tag)
            .map(|(_, value)| value)
            .collect()
    }
}

impl Emitter for RecordingEmitter {
    fn emit(&self, tag: Tag, value: &str) {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        items.push((tag, value.to_string()));
    }
}
