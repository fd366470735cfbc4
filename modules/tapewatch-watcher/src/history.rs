//! Per-account history — a bounded log of previously notified posts, used to
//! surface "earlier" context under back-referencing posts.
//!
//! Ordering matters: the current post is appended to its author's log before
//! the context lookup runs, and the lookup takes the second-most-recent entry
//! so a post never quotes itself.

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;

use tapewatch_common::{truncate_to_char_boundary, HistoryEntry, Post, WatchError};

use crate::store::StateStore;

/// Each account keeps its most recent entries only; the oldest are evicted
/// on append past the bound.
pub const HISTORY_CAP: usize = 30;

/// Context snippets are clipped to this many bytes.
const CONTEXT_MAX_BYTES: usize = 80;

pub struct HistoryTracker {
    store: StateStore,
    logs: HashMap<String, Vec<HistoryEntry>>,
}

impl HistoryTracker {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            logs: HashMap::new(),
        }
    }

    /// Record a notified post in its author's log and persist that log
    /// immediately. Must run before `recent_context` for the same post.
    pub fn append(&mut self, post: &Post) -> Result<(), WatchError> {
        let username = post.author.username.clone();
        self.ensure_loaded(&username);

        let log = self.logs.entry(username.clone()).or_default();
        log.push(HistoryEntry {
            id: post.id.clone(),
            text: post.text.clone(),
            timestamp: Utc::now(),
        });
        if log.len() > HISTORY_CAP {
            let excess = log.len() - HISTORY_CAP;
            log.drain(..excess);
        }
        self.store.save_history(&username, log)
    }

    /// The second-most-recent entry for an account, clipped for display.
    /// The most recent entry is skipped because it is the current post,
    /// appended just before this lookup. Requires at least 2 entries.
    pub fn recent_context(&self, username: &str) -> Option<String> {
        let log = self.logs.get(username)?;
        if log.len() < 2 {
            return None;
        }
        let entry = &log[log.len() - 2];
        Some(truncate_to_char_boundary(&entry.text, CONTEXT_MAX_BYTES).to_string())
    }

    fn ensure_loaded(&mut self, username: &str) {
        if self.logs.contains_key(username) {
            return;
        }
        let entries = match self.store.load_history(username) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(username, error = %e, "Failed to load history, starting empty");
                Vec::new()
            }
        };
        self.logs.insert(username.to_string(), entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::post;

    fn tracker() -> (tempfile::TempDir, HistoryTracker) {
        let dir = tempfile::tempdir().unwrap();
        let tracker = HistoryTracker::new(StateStore::new(dir.path()));
        (dir, tracker)
    }

    #[test]
    fn append_persists_incrementally() {
        let (dir, mut tracker) = tracker();
        let store = StateStore::new(dir.path());

        tracker.append(&post("1", "alice", "first")).unwrap();
        assert_eq!(store.load_history("alice").unwrap().len(), 1);

        tracker.append(&post("2", "alice", "second")).unwrap();
        assert_eq!(store.load_history("alice").unwrap().len(), 2);
    }

    #[test]
    fn log_is_bounded_with_oldest_evicted_first() {
        let (_dir, mut tracker) = tracker();

        for i in 0..HISTORY_CAP + 5 {
            tracker
                .append(&post(&format!("{i}"), "alice", &format!("post {i}")))
                .unwrap();
        }

        let log = &tracker.logs["alice"];
        assert_eq!(log.len(), HISTORY_CAP);
        // The five oldest entries are gone.
        assert_eq!(log[0].id, "5");
        assert_eq!(log[HISTORY_CAP - 1].id, format!("{}", HISTORY_CAP + 4));
    }

    #[test]
    fn context_needs_at_least_two_entries() {
        let (_dir, mut tracker) = tracker();

        assert!(tracker.recent_context("alice").is_none());

        tracker.append(&post("1", "alice", "first")).unwrap();
        // Only the current post is in the log: nothing to quote.
        assert!(tracker.recent_context("alice").is_none());
    }

    #[test]
    fn context_skips_the_current_post() {
        let (_dir, mut tracker) = tracker();

        tracker.append(&post("1", "alice", "the earlier call")).unwrap();
        tracker.append(&post("2", "alice", "as I said, target hit")).unwrap();

        // The just-appended post never surfaces as its own context.
        assert_eq!(
            tracker.recent_context("alice").as_deref(),
            Some("the earlier call")
        );
    }

    #[test]
    fn context_is_clipped_to_80_bytes() {
        let (_dir, mut tracker) = tracker();
        let long = "x".repeat(200);

        tracker.append(&post("1", "alice", &long)).unwrap();
        tracker.append(&post("2", "alice", "follow-up")).unwrap();

        let context = tracker.recent_context("alice").unwrap();
        assert_eq!(context.len(), 80);
        assert!(long.starts_with(&context));
    }

    #[test]
    fn context_reads_previously_persisted_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        // A prior run left two entries behind.
        let mut earlier = HistoryTracker::new(store.clone());
        earlier.append(&post("1", "bob", "oldest")).unwrap();
        earlier.append(&post("2", "bob", "most recent prior")).unwrap();

        // A fresh process appends the current post, then reads context.
        let mut tracker = HistoryTracker::new(store);
        tracker.append(&post("3", "bob", "as promised, update")).unwrap();
        assert_eq!(
            tracker.recent_context("bob").as_deref(),
            Some("most recent prior")
        );
    }
}
