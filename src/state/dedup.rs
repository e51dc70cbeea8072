use dashmap::DashSet;

/// Concurrent set of keys that have already been handled
///
/// `check_and_mark` is a single atomic check-and-insert: when several
/// workers race on the same key, exactly one of them sees `true`.
#[derive(Debug, Default)]
pub struct DedupStore {
    keys: DashSet<String>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as seen, returning true if it was not seen before
    ///
    /// # Example
    ///
    /// ```
    /// use sigrawler::state::DedupStore;
    ///
    /// let store = DedupStore::new();
    /// assert!(store.check_and_mark("https://example.com/"));
    /// assert!(!store.check_and_mark("https://example.com/"));
    /// ```
    pub fn check_and_mark(&self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_new_store_is_empty() {
        let store = DedupStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_check_and_mark() {
        let store = DedupStore::new();
        assert!(store.check_and_mark("a"));
        assert!(!store.check_and_mark("a"));
        assert!(store.check_and_mark("b"));
        assert!(store.contains("a"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_keys_are_exact() {
        let store = DedupStore::new();
        assert!(store.check_and_mark("https://example.com"));
        assert!(store.check_and_mark("https://example.com/"));
    }

    #[test]
    fn test_concurrent_identical_key_single_winner() {
        let store = Arc::new(DedupStore::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        std::thread::yield_now();
                    }
                    if store.check_and_mark("https://example.com/shared") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_single_winner() {
        let store = Arc::new(DedupStore::new());

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..64 {
            let store = Arc::clone(&store);
            tasks.spawn(async move { store.check_and_mark("bucket.s3.amazonaws.com") });
        }

        let mut winners = 0;
        while let Some(result) = tasks.join_next().await {
            if result.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }
}
