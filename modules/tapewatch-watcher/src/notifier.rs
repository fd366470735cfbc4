//! Notification formatting and dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use tapewatch_common::{truncate_to_char_boundary, MediaKind, MediaRef, Post};
use telegram_client::TelegramClient;

use crate::traits::Messenger;

/// Post text is clipped to this many bytes in a message.
const TEXT_PREVIEW_BYTES: usize = 300;

pub struct Notifier {
    messenger: Arc<dyn Messenger>,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    /// Deliver one message. A failure is logged and swallowed so the
    /// remaining posts still go out.
    pub async fn dispatch(&self, post_id: &str, body: &str) -> bool {
        match self.messenger.send(body).await {
            Ok(()) => {
                info!(post_id, "Notification sent");
                true
            }
            Err(e) => {
                warn!(post_id, error = %e, "Failed to deliver notification");
                false
            }
        }
    }
}

/// Build the HTML message body for one post.
pub fn format_message(
    post: &Post,
    priority: bool,
    commentary: Option<&str>,
    context: Option<&str>,
) -> String {
    let marker = if priority { "🔥" } else { "📊" };
    let mut message = format!(
        "{} <b>{}</b> (@{})\n\n{}",
        marker,
        post.author.display_name,
        post.author.username,
        truncate_to_char_boundary(&post.text, TEXT_PREVIEW_BYTES),
    );

    if let Some(tag) = media_annotation(&post.media) {
        message.push_str("\n\n");
        message.push_str(tag);
    }
    if let Some(commentary) = commentary {
        message.push_str("\n\n💡 ");
        message.push_str(commentary);
    }
    if let Some(context) = context {
        message.push_str(&format!("\n\n🧵 Earlier: \"{context}\""));
    }
    message.push_str(&format!("\n\n🔗 <a href=\"{}\">View on X</a>", post.url()));
    message
}

/// Media marker for a post. Photo wins over video when both are attached;
/// other media kinds get no annotation.
fn media_annotation(media: &[MediaRef]) -> Option<&'static str> {
    if media.iter().any(|m| m.kind == MediaKind::Photo) {
        Some("📷 Photo")
    } else if media.iter().any(|m| m.kind == MediaKind::Video) {
        Some("🎬 Video")
    } else {
        None
    }
}

/// Messenger backed by one Telegram chat.
pub struct TelegramChannel {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(client: TelegramClient, chat_id: String) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl Messenger for TelegramChannel {
    async fn send(&self, text: &str) -> anyhow::Result<()> {
        Ok(self.client.send_message(&self.chat_id, text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{post, with_media};

    #[test]
    fn priority_posts_get_the_fire_marker() {
        let p = post("1", "alice", "buy signal");
        assert!(format_message(&p, true, None, None).starts_with("🔥"));
        assert!(format_message(&p, false, None, None).starts_with("📊"));
    }

    #[test]
    fn includes_author_and_link() {
        let p = post("1001", "alice", "hello");
        let message = format_message(&p, false, None, None);

        assert!(message.contains("<b>Alice</b> (@alice)"));
        assert!(message.contains(r#"<a href="https://twitter.com/alice/status/1001">View on X</a>"#));
    }

    #[test]
    fn long_text_is_clipped() {
        let long = "y".repeat(400);
        let p = post("1", "alice", &long);
        let message = format_message(&p, false, None, None);

        assert!(message.contains(&"y".repeat(300)));
        assert!(!message.contains(&"y".repeat(301)));
    }

    #[test]
    fn photo_beats_video_in_the_annotation() {
        let p = with_media(
            with_media(post("1", "alice", "both"), MediaKind::Video),
            MediaKind::Photo,
        );
        let message = format_message(&p, false, None, None);
        assert!(message.contains("📷 Photo"));
        assert!(!message.contains("🎬 Video"));

        let p = with_media(post("2", "alice", "clip"), MediaKind::Video);
        assert!(format_message(&p, false, None, None).contains("🎬 Video"));

        let p = with_media(post("3", "alice", "gif"), MediaKind::Other);
        let message = format_message(&p, false, None, None);
        assert!(!message.contains("📷") && !message.contains("🎬"));
    }

    #[test]
    fn optional_blocks_appear_only_when_present() {
        let p = post("1", "alice", "as I said");

        let bare = format_message(&p, false, None, None);
        assert!(!bare.contains("💡") && !bare.contains("🧵"));

        let full = format_message(&p, false, Some("a note"), Some("earlier text"));
        assert!(full.contains("💡 a note"));
        assert!(full.contains("🧵 Earlier: \"earlier text\""));
    }
}
