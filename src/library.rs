// SPDX-License-Identifier: MIT

use crate::models::{MediaType, Title, TitleDetails};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// History keeps only the most recent entries.
pub const HISTORY_LIMIT: usize = 60;

const WATCHLIST_KEY: &str = "watchlist";
const HISTORY_KEY: &str = "history";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    pub fn from_title(title: &Title) -> Self {
        Self {
            id: title.id,
            media_type: title.kind(),
            title: title.display_title().to_string(),
            poster_path: title.poster_path.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_details(details: &TitleDetails, media_type: MediaType) -> Self {
        Self {
            id: details.id,
            media_type,
            title: details.display_title().to_string(),
            poster_path: details.poster_path.clone(),
            timestamp: Utc::now(),
        }
    }

    fn key(&self) -> (u64, MediaType) {
        (self.id, self.media_type)
    }
}

/// Storage collaborator for the ledger. Only serialized lists cross this
/// boundary.
pub trait Store {
    fn save(&self, key: &str, payload: &str) -> Result<()>;
    fn load(&self, key: &str) -> Result<Option<String>>;
}

/// JSON files in the config directory, one per list.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create library directory: {}", dir.display()))?;
        }
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for JsonFileStore {
    fn save(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.path(key);
        fs::write(&path, payload)
            .with_context(|| format!("Failed to write library file: {}", path.display()))
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read library file: {}", path.display()))?;
        Ok(Some(content))
    }
}

/// The watchlist and watch-history ledger. Entries are unique per
/// (id, media type) and ordered most-recent-first; mutations persist
/// through the store, and storage failures degrade to warnings so the
/// application stays usable.
#[derive(Debug)]
pub struct Library<S: Store> {
    store: S,
    watchlist: Vec<Entry>,
    history: Vec<Entry>,
}

impl<S: Store> Library<S> {
    pub fn open(store: S) -> Self {
        let watchlist = Self::load_list(&store, WATCHLIST_KEY);
        let history = Self::load_list(&store, HISTORY_KEY);
        Self {
            store,
            watchlist,
            history,
        }
    }

    fn load_list(store: &S, key: &str) -> Vec<Entry> {
        match store.load(key) {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                warn!("Discarding corrupt {} list: {}", key, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load {} list: {}", key, e);
                Vec::new()
            }
        }
    }

    pub fn watchlist(&self) -> &[Entry] {
        &self.watchlist
    }

    pub fn history(&self) -> &[Entry] {
        &self.history
    }

    pub fn in_watchlist(&self, id: u64, media_type: MediaType) -> bool {
        self.watchlist.iter().any(|e| e.key() == (id, media_type))
    }

    /// Removes the entry if present, otherwise prepends it. Returns the new
    /// membership state.
    pub fn toggle_watchlist(&mut self, entry: Entry) -> bool {
        let key = entry.key();
        let added = if self.watchlist.iter().any(|e| e.key() == key) {
            self.watchlist.retain(|e| e.key() != key);
            false
        } else {
            self.watchlist.insert(0, entry);
            true
        };
        self.persist(WATCHLIST_KEY, &self.watchlist);
        added
    }

    /// Moves (or inserts) the entry to the front and truncates to the
    /// history cap.
    pub fn record_history(&mut self, entry: Entry) {
        let key = entry.key();
        self.history.retain(|e| e.key() != key);
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_LIMIT);
        self.persist(HISTORY_KEY, &self.history);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist(HISTORY_KEY, &self.history);
    }

    fn persist(&self, key: &str, list: &[Entry]) {
        let payload = match serde_json::to_string_pretty(list) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize {} list: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.save(key, &payload) {
            warn!("Failed to persist {} list: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct MemoryStore {
        entries: Rc<RefCell<HashMap<String, String>>>,
    }

    impl Store for MemoryStore {
        fn save(&self, key: &str, payload: &str) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), payload.to_string());
            Ok(())
        }

        fn load(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }
    }

    struct FailingStore;

    impl Store for FailingStore {
        fn save(&self, _key: &str, _payload: &str) -> Result<()> {
            anyhow::bail!("disk on fire")
        }

        fn load(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("disk on fire")
        }
    }

    fn entry(id: u64, media_type: MediaType) -> Entry {
        Entry {
            id,
            media_type,
            title: format!("Title {}", id),
            poster_path: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn entries_normalize_from_search_results() {
        let raw = serde_json::json!({
            "id": 603,
            "media_type": "movie",
            "title": "The Matrix",
            "poster_path": "/matrix.jpg"
        });
        let title: Title = serde_json::from_value(raw).unwrap();
        let entry = Entry::from_title(&title);
        assert_eq!(entry.id, 603);
        assert_eq!(entry.media_type, MediaType::Movie);
        assert_eq!(entry.title, "The Matrix");
        assert_eq!(entry.poster_path.as_deref(), Some("/matrix.jpg"));
    }

    #[test]
    fn watchlist_toggles_membership() {
        let mut library = Library::open(MemoryStore::default());

        assert!(library.toggle_watchlist(entry(1, MediaType::Movie)));
        assert!(library.in_watchlist(1, MediaType::Movie));

        // Same id under a different media type is a distinct entry.
        assert!(library.toggle_watchlist(entry(1, MediaType::Tv)));
        assert_eq!(library.watchlist().len(), 2);

        assert!(!library.toggle_watchlist(entry(1, MediaType::Movie)));
        assert!(!library.in_watchlist(1, MediaType::Movie));
        assert_eq!(library.watchlist().len(), 1);
    }

    #[test]
    fn history_caps_at_the_limit_most_recent_first() {
        let mut library = Library::open(MemoryStore::default());

        for id in 0..(HISTORY_LIMIT as u64 + 1) {
            library.record_history(entry(id, MediaType::Movie));
        }

        assert_eq!(library.history().len(), HISTORY_LIMIT);
        assert_eq!(library.history()[0].id, HISTORY_LIMIT as u64);
        // The oldest entry fell off the end.
        assert!(!library.history().iter().any(|e| e.id == 0));
    }

    #[test]
    fn rerecording_moves_an_entry_to_the_front_without_duplicating() {
        let mut library = Library::open(MemoryStore::default());
        library.record_history(entry(1, MediaType::Movie));
        library.record_history(entry(2, MediaType::Tv));
        library.record_history(entry(1, MediaType::Movie));

        let ids: Vec<u64> = library.history().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn lists_survive_a_reload_through_the_store() {
        let store = MemoryStore::default();
        {
            let mut library = Library::open(store.clone());
            library.toggle_watchlist(entry(5, MediaType::Tv));
            library.record_history(entry(6, MediaType::Movie));
        }

        let reloaded = Library::open(store);
        assert!(reloaded.in_watchlist(5, MediaType::Tv));
        assert_eq!(reloaded.history()[0].id, 6);
    }

    #[test]
    fn storage_failures_do_not_poison_the_ledger() {
        let mut library = Library::open(FailingStore);
        assert!(library.watchlist().is_empty());

        library.record_history(entry(1, MediaType::Movie));
        assert_eq!(library.history().len(), 1);
        assert!(library.toggle_watchlist(entry(2, MediaType::Tv)));
    }
}
