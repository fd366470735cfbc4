use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response body for `GET /2/users/by/username/:username`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserLookupResponse {
    pub data: Option<UserData>,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

/// The user object returned by a lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    pub username: Option<String>,
    pub name: Option<String>,
}

/// Response body for `GET /2/users/:id/tweets`.
///
/// A successful body carries `data` plus the `includes` side-tables the
/// expansions asked for. An error body carries `errors` and no `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Vec<TimelinePost>,
    pub includes: Option<Includes>,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

/// A single post in a timeline response.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePost {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub attachments: Option<Attachments>,
}

/// Attachment references on a post, pointing into `includes.media`.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

/// The `includes` side-tables of a timeline response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<IncludedUser>,
    #[serde(default)]
    pub media: Vec<IncludedMedia>,
}

/// A user row from `includes.users`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncludedUser {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// A media row from `includes.media`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncludedMedia {
    pub media_key: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: Option<String>,
}

/// One entry of a v2 `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorItem {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ApiErrorItem {
    /// Human-readable summary, whichever fields are populated.
    pub fn summary(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(t), Some(d)) => format!("{t}: {d}"),
            (Some(t), None) => t.clone(),
            (None, Some(d)) => d.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}
