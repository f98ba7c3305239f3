//! Key-value storage
//!
//! Persistent string storage shared by every tab of the storefront. Each handle is a *tab*:
//! its writes are announced to every other tab through [`KeyValueStorage::subscribe`]. Handles
//! that share a tab also share its in-tab notifications ([`KeyValueStorage::notify`]).

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::broadcast;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

const EVENT_CAPACITY: usize = 64;

/// Identifies the tab that performed a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TabId(u64);

/// Announces that a key was written or removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,

    /// The tab that changed it.
    pub tab: TabId,
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error")]
    Io(#[from] std::io::Error),

    /// The write would exceed the storage quota.
    #[error("storage quota of {quota} bytes exceeded")]
    QuotaExceeded {
        /// Quota in bytes.
        quota: usize,
    },

    /// The backing file does not hold a JSON object of strings.
    #[error("storage contents are corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// Another writer panicked while holding the storage lock.
    #[error("storage is unavailable")]
    Unavailable,
}

/// Persistent string storage, one handle per tab.
pub trait KeyValueStorage: Send + Sync {
    /// The tab this handle writes as.
    fn tab(&self) -> TabId;

    /// Reads a value. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribes to writes made through any handle on the same backing store.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;

    /// Tells observers on this tab that `key` changed. Nothing is written.
    fn notify(&self, key: &str);

    /// Subscribes to notifications sent through any handle on the same backing store.
    ///
    /// Events carry the sending tab; observers keep the ones for their own tab.
    fn subscribe_notifications(&self) -> broadcast::Receiver<StorageEvent>;
}

/// Event fan-out and tab numbering shared by all handles on one backing store.
#[derive(Debug)]
pub(crate) struct StorageHub {
    events: broadcast::Sender<StorageEvent>,
    notifications: broadcast::Sender<StorageEvent>,
    next_tab: AtomicU64,
}

impl StorageHub {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (notifications, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            events,
            notifications,
            next_tab: AtomicU64::new(0),
        }
    }

    pub(crate) fn open_tab(&self) -> TabId {
        TabId(self.next_tab.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn publish(&self, key: &str, tab: TabId) {
        send(&self.events, key, tab);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    pub(crate) fn notify(&self, key: &str, tab: TabId) {
        send(&self.notifications, key, tab);
    }

    pub(crate) fn subscribe_notifications(&self) -> broadcast::Receiver<StorageEvent> {
        self.notifications.subscribe()
    }
}

fn send(channel: &broadcast::Sender<StorageEvent>, key: &str, tab: TabId) {
    // Nobody listening is fine.
    let _delivered = channel
        .send(StorageEvent {
            key: key.to_string(),
            tab,
        })
        .is_ok();
}
