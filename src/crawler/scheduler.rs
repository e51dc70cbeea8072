//! Scheduling primitives for a crawl session
//!
//! This module handles:
//! - Per-pipeline concurrency limiting via semaphores
//! - Pacing after requests to the target domain
//! - Tracking in-flight work so a session knows when it is done

use crate::config::Options;
use std::sync::Arc;
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};

/// Admission control for one pipeline
///
/// The scheduler coordinates:
/// - Concurrency limits (max in-flight fetches for the pipeline)
/// - Pacing (the delay taken after each request to the target domain)
///
/// A pacing sleep is taken while the permit is still held, so the delay
/// throttles the pipeline as a whole.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Crawl options (pacing parameters)
    options: Arc<Options>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `options` - The crawl options; `concurrency` sizes the semaphore
    pub fn new(options: Arc<Options>) -> Self {
        let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));

        Self { semaphore, options }
    }

    /// Waits for a fetch slot
    ///
    /// # Returns
    ///
    /// * `Some(permit)` - The slot; released on drop
    /// * `None` - The semaphore was closed
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.semaphore.clone().acquire_owned().await.ok()
    }

    /// Sleeps for the configured pacing delay
    pub async fn pace(&self) {
        let delay = self.options.pacing_delay();
        if !delay.is_zero() {
            tracing::trace!("Pacing for {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Returns the number of free fetch slots
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Counts the units of work a session still has outstanding
///
/// Every submitted request holds an [`InFlightGuard`] from the moment it is
/// accepted until its handler returns. Children are registered before their
/// parent's guard is released, so the count only reaches zero once the whole
/// crawl tree is finished.
#[derive(Debug, Clone)]
pub struct InFlight {
    counter: Arc<watch::Sender<usize>>,
}

impl InFlight {
    pub fn new() -> Self {
        let (counter, _) = watch::channel(0);
        Self {
            counter: Arc::new(counter),
        }
    }

    /// Registers one unit of work
    pub fn enter(&self) -> InFlightGuard {
        self.counter.send_modify(|n| *n += 1);
        InFlightGuard {
            counter: Arc::clone(&self.counter),
        }
    }

    /// Returns the number of outstanding units
    pub fn count(&self) -> usize {
        *self.counter.borrow()
    }

    /// Waits until no work is outstanding
    pub async fn wait_idle(&self) {
        let mut rx = self.counter.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases one unit of in-flight work on drop
#[derive(Debug)]
pub struct InFlightGuard {
    counter: Arc<watch::Sender<usize>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.send_modify(|n| *n = n.saturating_sub(1));
    }
}
