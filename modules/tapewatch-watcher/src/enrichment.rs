//! Commentary triggers and the one-shot enrichment call.
//!
//! Enrichment is best-effort: a failed request is logged and the
//! notification goes out bare. Nothing is retried within a run.

use std::sync::Arc;

use tracing::warn;

use tapewatch_common::{contains_ci, Config, Post};

use crate::stats::WatchStats;
use crate::traits::Commentator;

/// Posts shorter than this always qualify for commentary.
const SHORT_POST_CHARS: usize = 150;

pub struct EnrichmentEngine {
    commentator: Option<Arc<dyn Commentator>>,
    keywords: Vec<String>,
    phrases: Vec<String>,
}

impl EnrichmentEngine {
    pub fn new(commentator: Option<Arc<dyn Commentator>>, config: &Config) -> Self {
        Self {
            commentator,
            keywords: config.keywords.clone(),
            phrases: config.back_reference_phrases.clone(),
        }
    }

    /// Any priority keyword appears in the text (case-insensitive).
    pub fn is_priority(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| contains_ci(text, k))
    }

    /// Any back-reference phrase appears in the text (case-insensitive).
    pub fn has_back_reference(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| contains_ci(text, p))
    }

    fn should_request(&self, post: &Post) -> bool {
        self.has_back_reference(&post.text)
            || self.is_priority(&post.text)
            || post.text.chars().count() < SHORT_POST_CHARS
    }

    /// Request commentary for a post when a trigger fires and a commentator
    /// is configured. Returns the commentary text, or `None` when disabled,
    /// untriggered, or failed.
    pub async fn enrich(&self, post: &Post, stats: &mut WatchStats) -> Option<String> {
        let commentator = self.commentator.as_ref()?;
        if !self.should_request(post) {
            return None;
        }

        stats.commentary_requested += 1;
        let prompt = build_prompt(post);
        match commentator.comment(&prompt).await {
            Ok(text) => {
                stats.commentary_attached += 1;
                Some(text)
            }
            Err(e) => {
                warn!(
                    post_id = post.id.as_str(),
                    error = %e,
                    "Commentary request failed, continuing without it"
                );
                None
            }
        }
    }
}

/// The prompt carries the post text, the author handle, and whether media is
/// attached.
fn build_prompt(post: &Post) -> String {
    format!(
        "You annotate trader posts for a notification feed. In one or two \
         sentences, note what this post is claiming and anything a reader \
         should verify before acting on it.\n\n\
         Author: @{}\nMedia attached: {}\nPost:\n{}",
        post.author.username,
        if post.media.is_empty() { "no" } else { "yes" },
        post.text
    )
}
