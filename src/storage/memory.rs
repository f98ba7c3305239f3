//! In-memory storage

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::broadcast;

use super::{KeyValueStorage, StorageError, StorageEvent, StorageHub, TabId};

/// Storage held in process memory, optionally with a byte quota.
///
/// Clones share the same tab. Use [`MemoryStorage::open_tab`] for a second tab on the same
/// data.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    shared: Arc<MemoryShared>,
    tab: TabId,
}

#[derive(Debug)]
struct MemoryShared {
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
    hub: StorageHub,
}

impl MemoryStorage {
    /// Creates empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates empty storage that refuses writes once keys and values exceed `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes))
    }

    /// Opens another tab on the same data.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            tab: self.shared.hub.open_tab(),
        }
    }

    fn build(quota: Option<usize>) -> Self {
        let hub = StorageHub::new();
        let tab = hub.open_tab();

        Self {
            shared: Arc::new(MemoryShared {
                entries: Mutex::new(BTreeMap::new()),
                quota,
                hub,
            }),
            tab,
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.shared
            .entries
            .lock()
            .map_err(|_poisoned| StorageError::Unavailable)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn tab(&self) -> TabId {
        self.tab
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut entries = self.entries()?;

            if let Some(quota) = self.shared.quota {
                let used: usize = entries
                    .iter()
                    .filter(|(existing, _)| existing.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();

                if used + key.len() + value.len() > quota {
                    return Err(StorageError::QuotaExceeded { quota });
                }
            }

            entries.insert(key.to_string(), value.to_string());
        }

        self.shared.hub.publish(key, self.tab);

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let removed = self.entries()?.remove(key).is_some();

        if removed {
            self.shared.hub.publish(key, self.tab);
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.hub.subscribe()
    }

    fn notify(&self, key: &str) {
        self.shared.hub.notify(key, self.tab);
    }

    fn subscribe_notifications(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.hub.subscribe_notifications()
    }
}
