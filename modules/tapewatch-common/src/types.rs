use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Accounts ---

/// A monitored account. `resolved_id` is populated lazily from the handle
/// cache or a lookup call and is never invalidated once known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub handle: String,
    pub resolved_id: Option<String>,
}

/// Denormalized author info attached to every fetched post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub display_name: String,
}

impl Author {
    /// Placeholder for posts whose author row is missing from the response
    /// side-table.
    pub fn unknown() -> Self {
        Self {
            username: "unknown".to_string(),
            display_name: "Unknown".to_string(),
        }
    }
}

// --- Posts ---

/// A normalized post. Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    pub author: Author,
}

impl Post {
    /// Canonical link back to the original post.
    pub fn url(&self) -> String {
        format!(
            "https://twitter.com/{}/status/{}",
            self.author.username, self.id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    #[serde(other)]
    Other,
}

impl MediaKind {
    /// Map an upstream media `type` string. Anything that is not a plain
    /// photo or video (animated_gif, future types) is `Other`.
    pub fn from_api(media_type: &str) -> Self {
        match media_type {
            "photo" => MediaKind::Photo,
            "video" => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRef {
    pub key: String,
    pub kind: MediaKind,
    pub url: Option<String>,
}

// --- History ---

/// One notified post in an account's bounded history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_from_api() {
        assert_eq!(MediaKind::from_api("photo"), MediaKind::Photo);
        assert_eq!(MediaKind::from_api("video"), MediaKind::Video);
        assert_eq!(MediaKind::from_api("animated_gif"), MediaKind::Other);
    }

    #[test]
    fn post_url_links_back_to_author() {
        let post = Post {
            id: "1001".to_string(),
            author_id: "555".to_string(),
            text: "hello".to_string(),
            created_at: Utc::now(),
            media: vec![],
            author: Author {
                username: "alice".to_string(),
                display_name: "Alice".to_string(),
            },
        };
        assert_eq!(post.url(), "https://twitter.com/alice/status/1001");
    }
}
