use std::env;
use std::path::PathBuf;

use tracing::info;

/// Priority keywords a post is scanned for. A match flags the notification
/// and qualifies the post for commentary.
fn default_keywords() -> Vec<String> {
    ["buy", "sell", "alert", "breaking", "$"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Back-reference phrases. A match pulls recent history context into the
/// notification and qualifies the post for commentary.
fn default_back_references() -> Vec<String> {
    [
        "as i said",
        "like i said",
        "as mentioned",
        "as noted",
        "following up",
        "as promised",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // X API
    pub x_bearer_token: String,

    // Telegram
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    // Commentary (optional; absence disables enrichment)
    pub gemini_api_key: Option<String>,

    // Monitoring
    pub handles: Vec<String>,
    pub keywords: Vec<String>,
    pub back_reference_phrases: Vec<String>,
    pub notify_cap: usize,

    // State files
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let handles: Vec<String> = required_env("WATCH_HANDLES")
            .split(',')
            .map(|h| h.trim().trim_start_matches('@').to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if handles.is_empty() {
            panic!("WATCH_HANDLES must list at least one handle");
        }

        Self {
            x_bearer_token: required_env("X_BEARER_TOKEN"),
            telegram_bot_token: required_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: required_env("TELEGRAM_CHAT_ID"),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            handles,
            keywords: default_keywords(),
            back_reference_phrases: default_back_references(),
            notify_cap: 5,
            data_dir: PathBuf::from(
                env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
        }
    }

    /// Log the loaded configuration with secrets elided.
    pub fn log_redacted(&self) {
        info!(
            handles = %self.handles.join(","),
            data_dir = %self.data_dir.display(),
            commentary = self.gemini_api_key.is_some(),
            notify_cap = self.notify_cap,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
