use super::atomic_json::AtomicJsonFile;
use lexforge_core::error::Result;
use lexforge_core::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

type Entries = BTreeMap<String, String>;

/// Persistent key-value store backed by one JSON object file.
///
/// Every write is a locked read-modify-write of the whole document, so two
/// processes writing different keys never lose each other's entries.
pub struct JsonFileStore {
    file: AtomicJsonFile<Entries>,
}

impl JsonFileStore {
    pub const FILENAME: &'static str = "local_storage.json";

    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Store file inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir.into().join(Self::FILENAME))
    }

    fn entries(&self) -> Result<Entries> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!("Persisting key '{}'", key);
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Entries::new(), |entries| {
            entries.remove(key);
            Ok(())
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_keys().collect())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Entries::new(), |entries| {
            for key in keys {
                entries.remove(*key);
            }
            Ok(())
        })
    }
}
