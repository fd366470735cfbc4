pub mod error;
pub mod types;

pub use error::{Result, XApiError};
pub use types::{
    Attachments, Includes, IncludedMedia, IncludedUser, TimelinePost, TimelineResponse,
    UserLookupResponse,
};

use std::time::Duration;

const BASE_URL: &str = "https://api.twitter.com/2";

/// All listing and lookup calls share one fixed timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed page size for timeline fetches. There is no pagination: each poll
/// takes the most recent page only.
const TIMELINE_PAGE_SIZE: &str = "10";

pub struct XApiClient {
    client: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

impl XApiClient {
    pub fn new(bearer_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            bearer_token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Look up the stable numeric user id for a handle.
    pub async fn lookup_user_id(&self, handle: &str) -> Result<String> {
        let url = format!("{}/users/by/username/{}", self.base_url, handle);
        tracing::debug!(handle, "Looking up user id");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: UserLookupResponse = resp.json().await?;
        match body.data {
            Some(user) => Ok(user.id),
            None => Err(XApiError::HandleNotFound(handle.to_string())),
        }
    }

    /// Fetch the most recent posts for a user id, with the author and media
    /// side-tables expanded. Query parameters are fixed.
    pub async fn user_timeline(&self, user_id: &str) -> Result<TimelineResponse> {
        let url = format!("{}/users/{}/tweets", self.base_url, user_id);
        tracing::debug!(user_id, "Fetching user timeline");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("max_results", TIMELINE_PAGE_SIZE),
                ("tweet.fields", "created_at,attachments"),
                ("expansions", "author_id,attachments.media_keys"),
                ("user.fields", "username,name"),
                ("media.fields", "media_key,type,url"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: TimelineResponse = resp.json().await?;
        if body.data.is_empty() {
            if let Some(err) = body.errors.first() {
                return Err(XApiError::Payload(err.summary()));
            }
        }

        tracing::debug!(user_id, count = body.data.len(), "Fetched timeline page");
        Ok(body)
    }
}
