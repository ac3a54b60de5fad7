//! Last-used pattern per host, persisted through a key-value store.

mod history;
mod service;
mod store;

pub use history::{DEFAULT_LIMIT, HISTORY_KEY, HistoryEntry, SiteHistory};
pub use service::{HistoryService, SiteRecorder};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, default_store_path};
