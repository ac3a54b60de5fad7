use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::KeyValueStore;

/// Store key holding the whole history list.
pub const HISTORY_KEY: &str = "regexHistory";
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub host: String,
    pub regex: String,
}

/// Most-recent-first, at most one entry per host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteHistory {
    entries: Vec<HistoryEntry>,
}

impl SiteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A missing key is an empty history. So is a value of the wrong shape,
    /// which is logged and then overwritten by the next save.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(value) = store.get(HISTORY_KEY)? else {
            return Ok(Self::new());
        };
        match serde_json::from_value(value) {
            Ok(history) => Ok(history),
            Err(e) => {
                log::warn!("Ignoring malformed {}: {}", HISTORY_KEY, e);
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(HISTORY_KEY, serde_json::to_value(self)?)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, host: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.host == host)
            .map(|entry| entry.regex.as_str())
    }

    /// Moves `host` to the front with its new text and truncates to `limit`.
    pub fn record(&mut self, host: &str, regex: &str, limit: usize) {
        self.entries.retain(|entry| entry.host != host);
        self.entries.insert(
            0,
            HistoryEntry {
                host: host.to_string(),
                regex: regex.to_string(),
            },
        );
        self.entries.truncate(limit);
    }

    pub fn remove(&mut self, host: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.host != host);
        self.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_record_is_most_recent_first_and_unique() {
        let mut history = SiteHistory::new();
        history.record("a.com", "one", DEFAULT_LIMIT);
        history.record("b.com", "two", DEFAULT_LIMIT);
        history.record("a.com", "three", DEFAULT_LIMIT);

        let hosts: Vec<&str> = history.entries().iter().map(|e| e.host.as_str()).collect();
        assert_eq!(hosts, vec!["a.com", "b.com"]);
        assert_eq!(history.lookup("a.com"), Some("three"));
        assert_eq!(history.lookup("c.com"), None);
    }

    #[test]
    fn test_record_evicts_oldest_past_limit() {
        let mut history = SiteHistory::new();
        for i in 0..21 {
            history.record(&format!("host{}.com", i), "x", DEFAULT_LIMIT);
        }
        assert_eq!(history.len(), 20);
        assert_eq!(history.entries()[0].host, "host20.com");
        assert_eq!(history.lookup("host0.com"), None);
        assert_eq!(history.lookup("host1.com"), Some("x"));
    }

    #[test]
    fn test_remove() {
        let mut history = SiteHistory::new();
        history.record("a.com", "one", DEFAULT_LIMIT);
        assert!(history.remove("a.com"));
        assert!(!history.remove("a.com"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut history = SiteHistory::new();
        history.record("example.com", "foo\nbar", DEFAULT_LIMIT);
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "host": "example.com", "regex": "foo\nbar" }])
        );
    }

    #[test]
    fn test_load_tolerates_missing_and_malformed() {
        let store = MemoryStore::new();
        assert!(SiteHistory::load(&store).unwrap().is_empty());

        store
            .set(HISTORY_KEY, serde_json::json!({ "not": "a list" }))
            .unwrap();
        assert!(SiteHistory::load(&store).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut history = SiteHistory::new();
        history.record("example.com", "foo", DEFAULT_LIMIT);
        history.save(&store).unwrap();

        assert_eq!(SiteHistory::load(&store).unwrap(), history);
    }
}
