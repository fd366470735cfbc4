// Trait abstractions for the watcher's external dependencies.
//
// AccountDirectory — handle → id lookups (X user lookup endpoint).
// PostTimeline — recent posts per user id, already joined to author/media.
// Commentator — one-shot commentary generation.
// Messenger — outbound delivery of one formatted message.
//
// These enable deterministic testing with MockDirectory, MockTimeline,
// MockCommentator and MockMessenger: no network. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use gemini_client::GeminiClient;
use tapewatch_common::Post;
use x_client::XApiClient;

use crate::fetcher;

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Resolve a handle to its stable numeric user id.
    async fn lookup_id(&self, handle: &str) -> Result<String>;
}

#[async_trait]
pub trait PostTimeline: Send + Sync {
    /// The most recent posts for a user id, in upstream response order.
    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>>;
}

#[async_trait]
pub trait Commentator: Send + Sync {
    /// One-shot commentary for a prompt.
    async fn comment(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver one formatted message to the configured chat.
    async fn send(&self, text: &str) -> Result<()>;
}

#[async_trait]
impl AccountDirectory for XApiClient {
    async fn lookup_id(&self, handle: &str) -> Result<String> {
        Ok(self.lookup_user_id(handle).await?)
    }
}

#[async_trait]
impl PostTimeline for XApiClient {
    async fn recent_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        let resp = self.user_timeline(user_id).await?;
        Ok(fetcher::posts_from_timeline(user_id, resp))
    }
}

#[async_trait]
impl Commentator for GeminiClient {
    async fn comment(&self, prompt: &str) -> Result<String> {
        Ok(self.generate(prompt).await?)
    }
}
