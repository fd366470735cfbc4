pub mod error;

pub use error::{Result, TelegramError};

use std::time::Duration;

use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct TelegramClient {
    client: reqwest::Client,
    bot_token: String,
    base_url: String,
}

/// Body for the `sendMessage` method. Rich-text markup stays enabled and
/// link previews are allowed, so the post link renders a preview card.
#[derive(Debug, Clone, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Envelope every Bot API method replies with.
#[derive(Debug, Clone, Deserialize)]
struct MethodResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(bot_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            bot_token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Deliver one HTML-formatted message to a chat.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };

        let resp = self.client.post(&url).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MethodResponse = resp.json().await?;
        if !body.ok {
            return Err(TelegramError::Rejected(
                body.description.unwrap_or_else(|| "no description".to_string()),
            ));
        }

        tracing::debug!(chat_id, chars = text.len(), "Telegram message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_body_shape() {
        let request = SendMessageRequest {
            chat_id: "-100123",
            text: "<b>hi</b>",
            parse_mode: "HTML",
            disable_web_page_preview: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["chat_id"], "-100123");
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(value["disable_web_page_preview"], false);
    }

    #[test]
    fn parses_method_response() {
        let body: MethodResponse =
            serde_json::from_str(r#"{"ok": true, "result": {"message_id": 7}}"#).unwrap();
        assert!(body.ok);

        let body: MethodResponse =
            serde_json::from_str(r#"{"ok": false, "description": "Bad Request"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.description.as_deref(), Some("Bad Request"));
    }
}
