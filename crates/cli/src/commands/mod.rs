use std::sync::Arc;

use anyhow::Result;
use regex_search_history::{HistoryService, JsonFileStore, KeyValueStore, MemoryStore};

use crate::config::Settings;

pub mod forget;
pub mod help;
pub mod history;
pub mod search;
pub mod show_config;
pub mod validate_patterns;
pub mod version;

pub(crate) fn open_history(settings: &Settings) -> Result<HistoryService> {
    let store: Arc<dyn KeyValueStore> = match settings.history_path() {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => {
            log::warn!("No data directory; history will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    HistoryService::spawn(store, settings.history_limit)
}

/// One-line rendering of stored or matched text.
pub(crate) fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}
