//! Batch driver: one independent crawl session per seed

use crate::crawler::coordinator::Crawler;
use crate::state::Results;
use crate::SigrawlerError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The outcome of crawling one seed
#[derive(Debug)]
pub struct SeedOutcome {
    pub seed: String,
    pub result: Result<Results, SigrawlerError>,
}

/// Per-seed outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<SeedOutcome>,
}

impl BatchReport {
    /// Concatenates the results of every successful seed, in seed order
    ///
    /// Sessions deduplicate independently, so a URL may appear once per seed.
    pub fn merged(&self) -> Results {
        let mut merged = Results::default();
        for outcome in &self.outcomes {
            if let Ok(results) = &outcome.result {
                merged.extend(results.clone());
            }
        }
        merged
    }

    /// Returns the seeds that failed, with their errors
    pub fn failures(&self) -> Vec<(&str, &SigrawlerError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.seed.as_str(), e)))
            .collect()
    }

    /// Returns the number of seeds that completed
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Returns true if there was at least one seed and none completed
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.succeeded() == 0
    }
}

/// Crawls every seed, at most `max_sessions` at a time
///
/// A failing seed never aborts the batch; its error is kept in its
/// [`SeedOutcome`].
///
/// # Arguments
///
/// * `crawler` - The crawler shared by all sessions
/// * `seeds` - Seed URLs, in the order outcomes are reported
/// * `max_sessions` - Maximum number of concurrent sessions (at least 1)
pub async fn run_batch(
    crawler: Arc<Crawler>,
    seeds: Vec<String>,
    max_sessions: usize,
) -> BatchReport {
    let semaphore = Arc::new(Semaphore::new(max_sessions.max(1)));
    let mut tasks = JoinSet::new();

    for (index, seed) in seeds.iter().enumerate() {
        let crawler = Arc::clone(&crawler);
        let semaphore = Arc::clone(&semaphore);
        let seed = seed.clone();

        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => crawler.crawl(&seed).await,
                Err(e) => Err(SigrawlerError::Session {
                    seed: seed.clone(),
                    message: e.to_string(),
                }),
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<Results, SigrawlerError>>> =
        seeds.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => tracing::error!("Session task failed: {}", e),
        }
    }

    let outcomes = seeds
        .into_iter()
        .zip(slots)
        .map(|(seed, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(SigrawlerError::Session {
                    seed: seed.clone(),
                    message: "session task panicked".to_string(),
                })
            });

            if let Err(e) = &result {
                tracing::warn!("Seed {} failed: {}", seed, e);
            }

            SeedOutcome { seed, result }
        })
        .collect();

    BatchReport { outcomes }
}
