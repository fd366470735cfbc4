//! Post fetching — one timeline request per resolved account, joining the
//! response side-tables into normalized posts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use tapewatch_common::{Account, Author, MediaKind, MediaRef, Post};
use x_client::{IncludedMedia, IncludedUser, TimelineResponse};

use crate::stats::WatchStats;
use crate::traits::PostTimeline;

pub struct PostFetcher {
    timeline: Arc<dyn PostTimeline>,
}

impl PostFetcher {
    pub fn new(timeline: Arc<dyn PostTimeline>) -> Self {
        Self { timeline }
    }

    /// Fetch recent posts for every resolved account. A per-account failure
    /// is logged and skipped; the remaining accounts still contribute posts.
    /// Output order is per-account response order, accounts in input order.
    pub async fn fetch_all(&self, accounts: &[Account], stats: &mut WatchStats) -> Vec<Post> {
        let mut posts = Vec::new();
        for account in accounts {
            let Some(user_id) = account.resolved_id.as_deref() else {
                continue;
            };
            match self.timeline.recent_posts(user_id).await {
                Ok(mut batch) => {
                    info!(
                        handle = account.handle.as_str(),
                        count = batch.len(),
                        "Fetched posts"
                    );
                    posts.append(&mut batch);
                }
                Err(e) => {
                    warn!(
                        handle = account.handle.as_str(),
                        error = %e,
                        "Failed to fetch posts, skipping account"
                    );
                    stats.fetch_failures += 1;
                }
            }
        }
        posts
    }
}

/// Join a raw timeline response into normalized posts: author rows come from
/// `includes.users`, media rows from `includes.media` via each post's
/// attachment keys. Posts with no attachments get an empty media list; an
/// author with no side-table row gets the placeholder author.
pub fn posts_from_timeline(user_id: &str, resp: TimelineResponse) -> Vec<Post> {
    let includes = resp.includes.unwrap_or_default();
    let users: HashMap<&str, &IncludedUser> =
        includes.users.iter().map(|u| (u.id.as_str(), u)).collect();
    let media: HashMap<&str, &IncludedMedia> = includes
        .media
        .iter()
        .map(|m| (m.media_key.as_str(), m))
        .collect();

    resp.data
        .into_iter()
        .map(|post| {
            let author_id = post.author_id.unwrap_or_else(|| user_id.to_string());
            let author = users
                .get(author_id.as_str())
                .map(|u| Author {
                    username: u.username.clone(),
                    display_name: u.name.clone(),
                })
                .unwrap_or_else(Author::unknown);
            let media_refs = post
                .attachments
                .map(|a| a.media_keys)
                .unwrap_or_default()
                .into_iter()
                .map(|key| match media.get(key.as_str()) {
                    Some(m) => MediaRef {
                        kind: MediaKind::from_api(&m.media_type),
                        url: m.url.clone(),
                        key,
                    },
                    None => MediaRef {
                        kind: MediaKind::Other,
                        url: None,
                        key,
                    },
                })
                .collect();
            Post {
                id: post.id,
                author_id,
                text: post.text,
                created_at: post.created_at.unwrap_or_else(Utc::now),
                media: media_refs,
                author,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post, MockTimeline};

    fn timeline_body(body: &str) -> TimelineResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn joins_author_and_media_side_tables() {
        let resp = timeline_body(
            r#"{
                "data": [{
                    "id": "1001",
                    "text": "chart attached",
                    "author_id": "555",
                    "created_at": "2026-08-06T14:03:00Z",
                    "attachments": {"media_keys": ["3_abc", "7_vid"]}
                }],
                "includes": {
                    "users": [{"id": "555", "username": "alice", "name": "Alice"}],
                    "media": [
                        {"media_key": "3_abc", "type": "photo", "url": "https://pbs.example/a.jpg"},
                        {"media_key": "7_vid", "type": "video"}
                    ]
                }
            }"#,
        );

        let posts = posts_from_timeline("555", resp);
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.author.username, "alice");
        assert_eq!(post.author.display_name, "Alice");
        assert_eq!(post.media.len(), 2);
        assert_eq!(post.media[0].kind, MediaKind::Photo);
        assert_eq!(post.media[0].url.as_deref(), Some("https://pbs.example/a.jpg"));
        assert_eq!(post.media[1].kind, MediaKind::Video);
        assert!(post.media[1].url.is_none());
    }

    #[test]
    fn missing_author_row_gets_placeholder() {
        let resp = timeline_body(
            r#"{
                "data": [{
                    "id": "1001",
                    "text": "orphan",
                    "author_id": "555",
                    "created_at": "2026-08-06T14:03:00Z"
                }],
                "includes": {"users": []}
            }"#,
        );

        let posts = posts_from_timeline("555", resp);
        assert_eq!(posts[0].author.username, "unknown");
        assert_eq!(posts[0].author.display_name, "Unknown");
    }

    #[test]
    fn no_attachments_means_empty_media() {
        let resp = timeline_body(
            r#"{
                "data": [{
                    "id": "1001",
                    "text": "plain",
                    "author_id": "555",
                    "created_at": "2026-08-06T14:03:00Z"
                }],
                "includes": {
                    "users": [{"id": "555", "username": "alice", "name": "Alice"}]
                }
            }"#,
        );

        let posts = posts_from_timeline("555", resp);
        assert!(posts[0].media.is_empty());
    }

    #[test]
    fn unknown_media_key_falls_back_to_other() {
        let resp = timeline_body(
            r#"{
                "data": [{
                    "id": "1001",
                    "text": "dangling ref",
                    "author_id": "555",
                    "created_at": "2026-08-06T14:03:00Z",
                    "attachments": {"media_keys": ["3_missing"]}
                }],
                "includes": {
                    "users": [{"id": "555", "username": "alice", "name": "Alice"}]
                }
            }"#,
        );

        let posts = posts_from_timeline("555", resp);
        assert_eq!(posts[0].media.len(), 1);
        assert_eq!(posts[0].media[0].kind, MediaKind::Other);
        assert!(posts[0].media[0].url.is_none());
    }

    #[tokio::test]
    async fn one_failing_account_does_not_abort_the_rest() {
        let timeline = Arc::new(
            MockTimeline::new()
                .with_posts("1", vec![post("10", "alice", "a")])
                .with_failure("2")
                .with_posts("3", vec![post("30", "carol", "c")]),
        );
        let fetcher = PostFetcher::new(timeline);
        let accounts = vec![
            Account { handle: "alice".to_string(), resolved_id: Some("1".to_string()) },
            Account { handle: "bob".to_string(), resolved_id: Some("2".to_string()) },
            Account { handle: "carol".to_string(), resolved_id: Some("3".to_string()) },
        ];

        let mut stats = WatchStats::default();
        let posts = fetcher.fetch_all(&accounts, &mut stats).await;

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "30"]);
        assert_eq!(stats.fetch_failures, 1);
    }
}
