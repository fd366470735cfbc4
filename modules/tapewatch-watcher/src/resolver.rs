//! Handle resolution — maps configured handles to stable numeric user ids
//! through a persisted cache, so a successfully resolved handle is looked up
//! at most once across all runs.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use tapewatch_common::Account;

use crate::traits::AccountDirectory;

pub struct HandleResolver {
    directory: Arc<dyn AccountDirectory>,
    cache: HashMap<String, String>,
    added: bool,
}

impl HandleResolver {
    pub fn new(directory: Arc<dyn AccountDirectory>, cache: HashMap<String, String>) -> Self {
        Self {
            directory,
            cache,
            added: false,
        }
    }

    /// Resolve handles in order. A handle that fails to resolve (lookup
    /// error or not found) is logged and dropped for this run; it is retried
    /// from scratch next run. Failures are never cached.
    pub async fn resolve_all(&mut self, handles: &[String]) -> Vec<Account> {
        let mut accounts = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Some(id) = self.cache.get(handle) {
                debug!(
                    handle = handle.as_str(),
                    id = id.as_str(),
                    "Handle resolved from cache"
                );
                accounts.push(Account {
                    handle: handle.clone(),
                    resolved_id: Some(id.clone()),
                });
                continue;
            }

            match self.directory.lookup_id(handle).await {
                Ok(id) => {
                    info!(handle = handle.as_str(), id = id.as_str(), "Resolved handle");
                    self.cache.insert(handle.clone(), id.clone());
                    self.added = true;
                    accounts.push(Account {
                        handle: handle.clone(),
                        resolved_id: Some(id),
                    });
                }
                Err(e) => {
                    warn!(
                        handle = handle.as_str(),
                        error = %e,
                        "Failed to resolve handle, skipping this run"
                    );
                }
            }
        }
        accounts
    }

    /// True when this run added at least one cache entry, meaning the cache
    /// needs one write-back.
    pub fn cache_dirty(&self) -> bool {
        self.added
    }

    pub fn cache(&self) -> &HashMap<String, String> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDirectory;

    fn cache_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(h, id)| (h.to_string(), id.to_string()))
            .collect()
    }

    fn handles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn cached_handles_skip_the_lookup_call() {
        let directory = Arc::new(MockDirectory::new().with_id("alice", "555"));
        let mut resolver =
            HandleResolver::new(directory.clone(), cache_of(&[("alice", "555")]));

        let accounts = resolver.resolve_all(&handles(&["alice"])).await;

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].resolved_id.as_deref(), Some("555"));
        assert_eq!(directory.lookup_count(), 0);
        assert!(!resolver.cache_dirty());
    }

    #[tokio::test]
    async fn cache_miss_looks_up_and_marks_dirty() {
        let directory = Arc::new(MockDirectory::new().with_id("alice", "555"));
        let mut resolver = HandleResolver::new(directory.clone(), HashMap::new());

        let accounts = resolver.resolve_all(&handles(&["alice"])).await;

        assert_eq!(accounts[0].resolved_id.as_deref(), Some("555"));
        assert_eq!(directory.lookup_count(), 1);
        assert!(resolver.cache_dirty());
        assert_eq!(resolver.cache().get("alice").map(String::as_str), Some("555"));
    }

    #[tokio::test]
    async fn failed_handles_are_skipped_in_order() {
        let directory = Arc::new(
            MockDirectory::new()
                .with_id("alice", "555")
                .with_id("carol", "999"),
        );
        let mut resolver = HandleResolver::new(directory, HashMap::new());

        // "bob" is unknown to the directory and drops out.
        let accounts = resolver
            .resolve_all(&handles(&["alice", "bob", "carol"]))
            .await;

        let resolved: Vec<_> = accounts.iter().map(|a| a.handle.as_str()).collect();
        assert_eq!(resolved, vec!["alice", "carol"]);
        // The failure is not negatively cached.
        assert!(!resolver.cache().contains_key("bob"));
    }
}
