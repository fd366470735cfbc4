//! Seen-set dedup — partitions fetched posts into already-notified and new.

use std::collections::HashSet;

use tapewatch_common::Post;

/// Persisted set of post ids that have already been processed. Grows
/// monotonically and is never pruned.
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new(ids: HashSet<String>) -> Self {
        Self { ids }
    }

    /// Posts whose id has not been seen, in their original relative order.
    /// New ids are marked seen immediately, so a second call with the same
    /// input yields nothing.
    pub fn filter_new(&mut self, posts: &[Post]) -> Vec<Post> {
        posts
            .iter()
            .filter(|p| self.ids.insert(p.id.clone()))
            .cloned()
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::post;

    #[test]
    fn keeps_unseen_posts_in_order() {
        let mut seen = SeenSet::new(["2".to_string()].into_iter().collect());
        let posts = vec![
            post("1", "alice", "a"),
            post("2", "alice", "b"),
            post("3", "alice", "c"),
        ];

        let fresh = seen.filter_new(&posts);
        let ids: Vec<_> = fresh.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn marks_new_ids_seen_eagerly() {
        let mut seen = SeenSet::new(HashSet::new());
        let posts = vec![post("1", "alice", "a"), post("2", "alice", "b")];

        assert_eq!(seen.filter_new(&posts).len(), 2);
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("1") && seen.contains("2"));

        // Same input again, without persisting in between: nothing new.
        assert!(seen.filter_new(&posts).is_empty());
    }

    #[test]
    fn duplicate_ids_within_a_batch_survive_once() {
        let mut seen = SeenSet::new(HashSet::new());
        let posts = vec![post("1", "alice", "a"), post("1", "alice", "a again")];

        let fresh = seen.filter_new(&posts);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].text, "a");
    }
}
