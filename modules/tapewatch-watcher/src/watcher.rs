//! Run orchestration — one full poll cycle per invocation.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use gemini_client::GeminiClient;
use tapewatch_common::Config;
use telegram_client::TelegramClient;
use x_client::XApiClient;

use crate::dedup::SeenSet;
use crate::enrichment::EnrichmentEngine;
use crate::fetcher::PostFetcher;
use crate::history::HistoryTracker;
use crate::notifier::{self, Notifier, TelegramChannel};
use crate::resolver::HandleResolver;
use crate::stats::WatchStats;
use crate::store::StateStore;
use crate::traits::{AccountDirectory, Commentator, Messenger, PostTimeline};

pub struct Watcher {
    config: Config,
    store: StateStore,
    directory: Arc<dyn AccountDirectory>,
    timeline: Arc<dyn PostTimeline>,
    enrichment: EnrichmentEngine,
    notifier: Notifier,
}

impl Watcher {
    /// Wire the production clients from config. Commentary is optional: with
    /// no Gemini key the engine never issues a request.
    pub fn from_config(config: Config) -> Self {
        let x = Arc::new(XApiClient::new(config.x_bearer_token.clone()));

        let commentator: Option<Arc<dyn Commentator>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(key.clone()))),
            None => {
                warn!("GEMINI_API_KEY not set, skipping commentary");
                None
            }
        };

        let messenger = Arc::new(TelegramChannel::new(
            TelegramClient::new(config.telegram_bot_token.clone()),
            config.telegram_chat_id.clone(),
        ));

        Self::new(config, x.clone(), x, commentator, messenger)
    }

    pub fn new(
        config: Config,
        directory: Arc<dyn AccountDirectory>,
        timeline: Arc<dyn PostTimeline>,
        commentator: Option<Arc<dyn Commentator>>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let store = StateStore::new(config.data_dir.clone());
        let enrichment = EnrichmentEngine::new(commentator, &config);
        let notifier = Notifier::new(messenger);
        Self {
            config,
            store,
            directory,
            timeline,
            enrichment,
            notifier,
        }
    }

    /// Run one full poll cycle: load state, resolve, fetch, dedup, notify,
    /// persist.
    pub async fn run(&self) -> Result<WatchStats> {
        let mut stats = WatchStats::default();
        stats.handles_configured = self.config.handles.len() as u32;

        // Each run is a fresh process: reload everything from disk.
        let mut seen = SeenSet::new(self.store.load_seen()?);
        let cache = self.store.load_handle_cache()?;
        let mut history = HistoryTracker::new(self.store.clone());

        // 1. Resolve handles to user ids, cache-first. The cache is written
        // back once, immediately after resolution, and only when it grew.
        let mut resolver = HandleResolver::new(self.directory.clone(), cache);
        let accounts = resolver.resolve_all(&self.config.handles).await;
        stats.accounts_resolved = accounts.len() as u32;
        stats.resolve_failures = stats.handles_configured - stats.accounts_resolved;
        if resolver.cache_dirty() {
            self.store.save_handle_cache(resolver.cache())?;
        }

        // 2. Fetch the recent page of posts for every resolved account.
        let fetcher = PostFetcher::new(self.timeline.clone());
        let posts = fetcher.fetch_all(&accounts, &mut stats).await;
        stats.posts_fetched = posts.len() as u32;

        // 3. Partition against the persisted seen set.
        let new_posts = seen.filter_new(&posts);
        stats.posts_new = new_posts.len() as u32;

        // 4. Notify the first `notify_cap` new posts.
        for post in new_posts.iter().take(self.config.notify_cap) {
            let priority = self.enrichment.is_priority(&post.text);
            let back_reference = self.enrichment.has_back_reference(&post.text);

            // Append before the context read so the post cannot quote
            // itself.
            if let Err(e) = history.append(post) {
                warn!(post_id = post.id.as_str(), error = %e, "Failed to persist history entry");
            }

            let commentary = self.enrichment.enrich(post, &mut stats).await;
            let context = if back_reference {
                history.recent_context(&post.author.username)
            } else {
                None
            };

            let body =
                notifier::format_message(post, priority, commentary.as_deref(), context.as_deref());
            if self.notifier.dispatch(&post.id, &body).await {
                stats.notified += 1;
            } else {
                stats.notify_failures += 1;
            }
        }

        // 5. Persist end-of-run state: the grown seen set and this run's
        // snapshot. History was written incrementally above.
        self.store.save_seen(seen.ids())?;
        self.store.save_snapshot(&posts)?;

        Ok(stats)
    }
}
