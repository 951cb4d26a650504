use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store file {path:?} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Store file {path:?} is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not encode store contents for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-memory store; forgets everything on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.into(), value.into());
        Ok(())
    }
}

/// A store backed by one JSON object file, replaced on every `set`.
///
/// A missing file reads as an empty store. Writes go to a sibling `.tmp`
/// file which is then renamed over the original, so a crash mid-write
/// leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(JsonFileStore { path, values })
    }

    /// Open `path`, starting from an empty store when it cannot be read or
    /// parsed. The next `set` overwrites the unreadable file.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        JsonFileStore::open(path).unwrap_or_else(|err| {
            tracing::warn!("{}; starting with an empty store", err);
            JsonFileStore {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.into(), value.into());
        let content = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);
        std::fs::write(&tmp_path, content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("weather-store-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("cityName").unwrap(), None);

        store.set("cityName", "臺南市").unwrap();
        assert_eq!(store.get("cityName").unwrap().as_deref(), Some("臺南市"));
    }

    #[test]
    fn test_json_file_store_survives_reopen() {
        let path = temp_path();

        let mut store = JsonFileStore::open(&path).expect("Missing file should open empty");
        assert_eq!(store.get("cityName").unwrap(), None);
        store.set("cityName", "高雄市").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cityName").unwrap().as_deref(), Some("高雄市"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_file_store_rejects_garbage() {
        let path = temp_path();
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Parse { .. })
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_truncated_file_opens_empty_and_is_replaced() {
        let path = temp_path();
        std::fs::write(&path, r#"{"cityName": "高雄"#).unwrap();

        let mut store = JsonFileStore::open_or_empty(&path);
        assert_eq!(store.get("cityName").unwrap(), None);

        store.set("cityName", "臺中市").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cityName").unwrap().as_deref(), Some("臺中市"));

        let mut tmp_path = path.clone().into_os_string();
        tmp_path.push(".tmp");
        assert!(!PathBuf::from(tmp_path).exists());

        std::fs::remove_file(&path).unwrap();
    }
}
