use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::history::{HistoryEntry, SiteHistory};
use crate::store::KeyValueStore;

struct Save {
    host: String,
    regex: String,
}

enum Message {
    Save(Save),
    Stop,
}

struct Shared {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    // Serializes read-modify-write cycles against the store.
    write_lock: Mutex<()>,
}

impl Shared {
    fn apply(&self, save: &Save) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut history = SiteHistory::load(self.store.as_ref())?;
        history.record(&save.host, &save.regex, self.limit);
        history.save(self.store.as_ref())
    }
}

/// Owns the background writer. Saves are applied in the order they were sent;
/// nobody waits for them except `shutdown`.
pub struct HistoryService {
    shared: Arc<Shared>,
    tx: Option<flume::Sender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl HistoryService {
    pub fn spawn(store: Arc<dyn KeyValueStore>, limit: usize) -> Result<Self> {
        let shared = Arc::new(Shared {
            store,
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        });
        let (tx, rx) = flume::unbounded::<Message>();

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("regex-search-history".to_string())
            .spawn(move || {
                for message in rx.iter() {
                    let Message::Save(save) = message else {
                        break;
                    };
                    if let Err(e) = worker_shared.apply(&save) {
                        log::warn!("Failed to save history for {}: {:#}", save.host, e);
                    }
                }
            })
            .context("Failed to start history writer")?;

        Ok(Self {
            shared,
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Saved text for `host`. Store failures are logged and read as "none".
    pub fn last_for(&self, host: &str) -> Option<String> {
        match SiteHistory::load(self.shared.store.as_ref()) {
            Ok(history) => history.lookup(host).map(str::to_string),
            Err(e) => {
                log::warn!("Failed to load history: {:#}", e);
                None
            }
        }
    }

    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        Ok(SiteHistory::load(self.shared.store.as_ref())?
            .entries()
            .to_vec())
    }

    /// Removes `host` immediately. Returns whether an entry existed.
    pub fn forget(&self, host: &str) -> Result<bool> {
        let _guard = self.shared.write_lock.lock();
        let mut history = SiteHistory::load(self.shared.store.as_ref())?;
        let removed = history.remove(host);
        if removed {
            history.save(self.shared.store.as_ref())?;
        }
        Ok(removed)
    }

    pub fn recorder(&self, host: impl Into<String>) -> SiteRecorder {
        SiteRecorder {
            host: host.into(),
            tx: self.tx.clone(),
        }
    }

    /// Drains pending saves and joins the writer.
    pub fn shutdown(mut self) {
        self.stop(true);
    }

    fn stop(&mut self, wait: bool) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let Some(worker) = self.worker.take() else {
            return;
        };
        if !wait {
            return;
        }
        // Recorders may still hold senders, so closing the channel is not enough.
        let _ = tx.send(Message::Stop);
        if worker.join().is_err() {
            log::warn!("History writer panicked");
        }
    }
}

impl Drop for HistoryService {
    fn drop(&mut self) {
        // Leave in-flight saves to the detached writer.
        self.stop(false);
    }
}

/// Fire-and-forget saver bound to one host.
#[derive(Clone)]
pub struct SiteRecorder {
    host: String,
    tx: Option<flume::Sender<Message>>,
}

impl SiteRecorder {
    /// Queues `raw` as this host's latest text. Blank input is ignored.
    pub fn record(&self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let Some(tx) = &self.tx else {
            return;
        };
        let save = Save {
            host: self.host.clone(),
            regex: raw.to_string(),
        };
        if tx.send(Message::Save(save)).is_err() {
            log::warn!("History writer is gone; dropping save for {}", self.host);
        }
    }
}
