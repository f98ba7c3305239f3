//! File-backed storage

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tokio::sync::broadcast;

use super::{KeyValueStorage, StorageError, StorageEvent, StorageHub, TabId};

type Entries = BTreeMap<String, String>;

/// Storage persisted as a JSON object in a single file.
///
/// Reads always go to disk, so writes made by another process are visible on the next read.
/// Every write rewrites the whole file through a temporary file and a rename.
#[derive(Debug, Clone)]
pub struct FileStorage {
    shared: Arc<FileShared>,
    tab: TabId,
}

#[derive(Debug)]
struct FileShared {
    path: PathBuf,
    lock: Mutex<()>,
    hub: StorageHub,
}

impl FileStorage {
    /// Opens storage at `path`. The file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let hub = StorageHub::new();
        let tab = hub.open_tab();

        Self {
            shared: Arc::new(FileShared {
                path: path.into(),
                lock: Mutex::new(()),
                hub,
            }),
            tab,
        }
    }

    /// Opens another tab on the same file.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            tab: self.shared.hub.open_tab(),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    fn load(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.shared.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(StorageError::Corrupt),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), StorageError> {
        let path = &self.shared.path;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_vec_pretty(entries).map_err(StorageError::Corrupt)?;
        let staging = path.with_extension("tmp");

        fs::write(&staging, contents)?;
        fs::rename(&staging, path)?;

        Ok(())
    }

    fn modify(
        &self,
        key: &str,
        change: impl FnOnce(&mut Entries) -> bool,
    ) -> Result<(), StorageError> {
        let changed = {
            let _guard = self
                .shared
                .lock
                .lock()
                .map_err(|_poisoned| StorageError::Unavailable)?;

            let mut entries = self.load()?;
            let changed = change(&mut entries);

            if changed {
                self.save(&entries)?;
            }

            changed
        };

        if changed {
            self.shared.hub.publish(key, self.tab);
        }

        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn tab(&self) -> TabId {
        self.tab
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.modify(key, |entries| entries.remove(key).is_some())
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

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn storage_in(dir: &TempDir) -> FileStorage {
        FileStorage::open(dir.path().join("storage.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() -> TestResult {
        let dir = TempDir::new()?;
        let storage = storage_in(&dir);

        assert_eq!(storage.get_item("cart")?, None);

        Ok(())
    }

    #[test]
    fn values_survive_reopening() -> TestResult {
        let dir = TempDir::new()?;

        storage_in(&dir).set_item("cart", "[]")?;
        storage_in(&dir).set_item("token", "abc")?;

        let reopened = storage_in(&dir);
        assert_eq!(reopened.get_item("cart")?.as_deref(), Some("[]"));
        assert_eq!(reopened.get_item("token")?.as_deref(), Some("abc"));

        Ok(())
    }

    #[test]
    fn remove_deletes_only_that_key() -> TestResult {
        let dir = TempDir::new()?;
        let storage = storage_in(&dir);

        storage.set_item("cart", "[]")?;
        storage.set_item("token", "abc")?;
        storage.remove_item("cart")?;

        assert_eq!(storage.get_item("cart")?, None);
        assert_eq!(storage.get_item("token")?.as_deref(), Some("abc"));

        Ok(())
    }

    #[test]
    fn corrupt_file_is_reported() -> TestResult {
        let dir = TempDir::new()?;
        let storage = storage_in(&dir);

        fs::write(storage.path(), "not json")?;

        assert!(matches!(
            storage.get_item("cart"),
            Err(StorageError::Corrupt(_))
        ));

        Ok(())
    }

    #[test]
    fn other_tabs_hear_about_writes() -> TestResult {
        let dir = TempDir::new()?;
        let first = storage_in(&dir);
        let second = first.open_tab();
        let mut events = second.subscribe();

        first.set_item("cart", "[]")?;

        let event = events.try_recv()?;
        assert_eq!(event.key, "cart");
        assert_eq!(event.tab, first.tab());

        Ok(())
    }
}
