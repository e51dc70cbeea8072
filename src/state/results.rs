use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Items discovered by a crawl
///
/// Order reflects completion order and is not stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// In-scope URLs found through links and JavaScript endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,

    /// S3 bucket references
    #[serde(rename = "s3", default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<String>,
}

impl Results {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.buckets.is_empty()
    }

    /// Appends another result set after this one
    pub fn extend(&mut self, other: Results) {
        self.urls.extend(other.urls);
        self.buckets.extend(other.buckets);
    }
}

/// Thread-safe, append-only accumulator for one session's results
///
/// Deduplication is the caller's job; the session only appends keys that
/// won the dedup store race.
#[derive(Debug, Default)]
pub struct ResultsSink {
    inner: Mutex<Results>,
}

impl ResultsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_url(&self, url: String) {
        self.lock().urls.push(url);
    }

    pub fn push_bucket(&self, bucket: String) {
        self.lock().buckets.push(bucket);
    }

    /// Returns a copy of everything accumulated so far
    pub fn snapshot(&self) -> Results {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Results> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
