//! JSON file persistence — seen ids, handle cache, per-account history logs,
//! and the rolling snapshot of this run's fetch.
//!
//! Every run is a fresh process: state is loaded from these files at start
//! and written back before exit. Missing files read as empty collections; a
//! corrupt file is an error for the caller to surface.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use tapewatch_common::{HistoryEntry, Post, WatchError};

const SEEN_FILE: &str = "seen_posts.json";
const CACHE_FILE: &str = "handle_cache.json";
const SNAPSHOT_FILE: &str = "posts.json";

/// The snapshot keeps at most this many posts, newest first.
pub const SNAPSHOT_CAP: usize = 100;

#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_seen(&self) -> Result<HashSet<String>, WatchError> {
        self.read_or_default(SEEN_FILE)
    }

    /// Serialized as a plain array; membership matters, order does not.
    pub fn save_seen(&self, seen: &HashSet<String>) -> Result<(), WatchError> {
        self.write(SEEN_FILE, seen)
    }

    pub fn load_handle_cache(&self) -> Result<HashMap<String, String>, WatchError> {
        self.read_or_default(CACHE_FILE)
    }

    pub fn save_handle_cache(&self, cache: &HashMap<String, String>) -> Result<(), WatchError> {
        self.write(CACHE_FILE, cache)
    }

    pub fn load_history(&self, username: &str) -> Result<Vec<HistoryEntry>, WatchError> {
        self.read_or_default(&history_file(username))
    }

    pub fn save_history(&self, username: &str, entries: &[HistoryEntry]) -> Result<(), WatchError> {
        self.write(&history_file(username), entries)
    }

    /// Write the rolling snapshot: the most recent posts from this run's
    /// fetch, newest first, capped at `SNAPSHOT_CAP`. Fully replaces the
    /// previous snapshot rather than merging with it.
    pub fn save_snapshot(&self, posts: &[Post]) -> Result<(), WatchError> {
        let mut recent: Vec<&Post> = posts.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(SNAPSHOT_CAP);
        self.write(SNAPSHOT_FILE, &recent)
    }

    pub fn load_snapshot(&self) -> Result<Vec<Post>, WatchError> {
        self.read_or_default(SNAPSHOT_FILE)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, WatchError> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(body) => serde_json::from_str(&body)
                .map_err(|e| WatchError::Persist(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(WatchError::Persist(format!("{}: {e}", path.display()))),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), WatchError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| WatchError::Persist(format!("{}: {e}", self.dir.display())))?;
        let path = self.path(name);
        let body = serde_json::to_string(value)
            .map_err(|e| WatchError::Persist(format!("{}: {e}", path.display())))?;
        fs::write(&path, body)
            .map_err(|e| WatchError::Persist(format!("{}: {e}", path.display())))
    }
}

fn history_file(username: &str) -> String {
    format!("history_{username}.json")
}
