use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

/// Crawl options shared by every session of a run
///
/// Built once (from defaults, a TOML file, and command-line flags) and
/// handed to the crawler behind an `Arc`. Nothing mutates it afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Maximum link-following depth from the seed (the seed is depth 1, 0 = unlimited)
    pub depth: u32,

    /// Maximum number of in-flight fetches per pipeline
    pub concurrency: usize,

    /// Fixed delay after each request to the target domain (seconds)
    pub delay: u64,

    /// Upper bound of the random delay added to `delay` (seconds)
    pub random_delay: u64,

    /// Treat subdomains of the seed host as in scope
    pub include_subdomains: bool,

    /// Skip TLS certificate validation
    pub insecure: bool,

    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Fixed User-Agent; a random mobile one is picked per request when unset
    pub user_agent: Option<String>,

    /// Outbound proxies, used round-robin
    pub proxies: Vec<String>,

    /// Trace every request and response
    pub debug: bool,

    /// Maximum number of seeds crawled at the same time
    pub max_sessions: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            depth: 1,
            concurrency: 20,
            delay: 0,
            random_delay: 2,
            include_subdomains: false,
            insecure: false,
            timeout: 10,
            user_agent: None,
            proxies: Vec::new(),
            debug: false,
            max_sessions: 4,
        }
    }
}

impl Options {
    /// Returns the per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Returns true if a request at `depth` may still be issued
    pub fn within_depth(&self, depth: u32) -> bool {
        self.depth == 0 || depth <= self.depth
    }

    /// Computes the pause taken after a request: the fixed delay plus a
    /// uniformly drawn jitter in `[0, random_delay)`
    pub fn pacing_delay(&self) -> Duration {
        let fixed = Duration::from_secs(self.delay);
        if self.random_delay == 0 {
            return fixed;
        }

        let jitter_ms = rand::thread_rng().gen_range(0..self.random_delay.saturating_mul(1000));
        fixed.saturating_add(Duration::from_millis(jitter_ms))
    }
}
