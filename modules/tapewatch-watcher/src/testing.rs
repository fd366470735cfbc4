//! Shared mocks and fixtures for watcher tests — no network, no real
//! services. Compiled for unit tests and, via the `test-support` feature,
//! for the integration tests under `tests/`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use tapewatch_common::{Author, Config, MediaKind, MediaRef, Post};

use crate::traits::{AccountDirectory, Commentator, Messenger, PostTimeline};

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

/// Directory mock: fixed handle → id table; unknown handles error out.
/// Records every lookup so tests can assert the cache short-circuits.
#[derive(Default)]
pub struct MockDirectory {
    ids: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, handle: &str, id: &str) -> Self {
        self.ids.insert(handle.to_string(), id.to_string());
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl AccountDirectory for MockDirectory {
    async fn lookup_id(&self, handle: &str) -> Result<String> {
        self.lookups.lock().unwrap().push(handle.to_string());
        self.ids
            .get(handle)
            .cloned()
            .ok_or_else(|| anyhow!("no user found for handle: {handle}"))
    }
}

/// Timeline mock: fixed id → posts table; ids registered as failing error
/// out.
#[derive(Default)]
pub struct MockTimeline {
    posts: HashMap<String, Vec<Post>>,
    failing: Vec<String>,
}

impl MockTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(mut self, user_id: &str, posts: Vec<Post>) -> Self {
        self.posts.insert(user_id.to_string(), posts);
        self
    }

    pub fn with_failure(mut self, user_id: &str) -> Self {
        self.failing.push(user_id.to_string());
        self
    }
}

#[async_trait]
impl PostTimeline for MockTimeline {
    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        if self.failing.iter().any(|id| id == user_id) {
            return Err(anyhow!("simulated fetch failure for {user_id}"));
        }
        Ok(self.posts.get(user_id).cloned().unwrap_or_default())
    }
}

/// Commentator mock: canned reply or simulated failure. Records prompts.
pub struct MockCommentator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCommentator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Commentator for MockCommentator {
    async fn comment(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| anyhow!("simulated commentary failure"))
    }
}

/// Messenger mock: records every delivered message; optionally fails all
/// sends.
#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<String>>,
    failing: bool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, text: &str) -> Result<()> {
        if self.failing {
            return Err(anyhow!("simulated send failure"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A post fixture with a fixed timestamp.
pub fn post(id: &str, username: &str, text: &str) -> Post {
    post_at(
        id,
        username,
        text,
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
    )
}

pub fn post_at(id: &str, username: &str, text: &str, created_at: DateTime<Utc>) -> Post {
    let mut display_name = username.to_string();
    if let Some(first) = display_name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Post {
        id: id.to_string(),
        author_id: format!("u-{username}"),
        text: text.to_string(),
        created_at,
        media: vec![],
        author: Author {
            username: username.to_string(),
            display_name,
        },
    }
}

pub fn with_media(mut post: Post, kind: MediaKind) -> Post {
    let key = format!("m-{}", post.media.len());
    post.media.push(MediaRef {
        key,
        kind,
        url: None,
    });
    post
}

/// Config fixture pointing at a test data dir, with the default keyword and
/// phrase lists.
pub fn test_config(data_dir: &Path, handles: &[&str]) -> Config {
    Config {
        x_bearer_token: "test-bearer".to_string(),
        telegram_bot_token: "test-bot".to_string(),
        telegram_chat_id: "-100".to_string(),
        gemini_api_key: None,
        handles: handles.iter().map(|s| s.to_string()).collect(),
        keywords: ["buy", "sell", "alert", "breaking", "$"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        back_reference_phrases: [
            "as i said",
            "like i said",
            "as mentioned",
            "as noted",
            "following up",
            "as promised",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        notify_cap: 5,
        data_dir: data_dir.to_path_buf(),
    }
}
