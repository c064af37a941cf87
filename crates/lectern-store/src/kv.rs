//! Key-Value store with automatic serialization.

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const FILE_SUFFIX: &str = ".json";

#[derive(Clone)]
enum Backend {
    Dir(PathBuf),
    Memory(Arc<Mutex<BTreeMap<String, Vec<u8>>>>),
}

/// Type-safe JSON cache.
///
/// Clones share the same underlying storage.
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            Backend::Dir(path) => f.debug_tuple("Cache::Dir").field(path).finish(),
            Backend::Memory(_) => f.write_str("Cache::Memory"),
        }
    }
}

impl Cache {
    /// Open a directory-backed store, creating the directory if needed.
    ///
    /// Each key is stored as `<key>.json`.
    pub fn open_dir(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)
            .map_err(|e| StoreError::OpenError(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            backend: Backend::Dir(path),
        })
    }

    /// Open an empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(BTreeMap::new()))),
        }
    }

    /// Directory backing this store, if any.
    pub fn dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Dir(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, bytes)
    }

    /// Delete a value. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Dir(dir) => match fs::remove_file(file_path(dir, key)?) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Dir(dir) => Ok(file_path(dir, key)?.is_file()),
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
        }
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        match &self.backend {
            Backend::Dir(dir) => {
                let mut keys = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let name = entry?.file_name();
                    if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(FILE_SUFFIX)) {
                        keys.push(key.replace("__", ":"));
                    }
                }
                keys.sort();
                Ok(keys)
            }
            Backend::Memory(map) => Ok(lock(map)?.keys().cloned().collect()),
        }
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match &self.backend {
            Backend::Dir(dir) => match fs::read(file_path(dir, key)?) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
        }
    }

    fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Dir(dir) => {
                let path = file_path(dir, key)?;
                // Write then rename so a crash never leaves a truncated file.
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, &bytes)?;
                fs::rename(&tmp, &path)?;
                Ok(())
            }
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes);
                Ok(())
            }
        }
    }
}

fn lock(
    map: &Mutex<BTreeMap<String, Vec<u8>>>,
) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>, StoreError> {
    map.lock()
        .map_err(|_| StoreError::StoreError("memory store poisoned".to_string()))
}

fn file_path(dir: &Path, key: &str) -> Result<PathBuf, StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        && !key.starts_with('.')
        && !key.contains("__");
    if !valid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    // ':' is not portable in file names.
    Ok(dir.join(format!("{}{}", key.replace(':', "__"), FILE_SUFFIX)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        title: String,
        pages: u32,
    }

    fn entry() -> Entry {
        Entry {
            title: "Programming Rust".to_string(),
            pages: 550,
        }
    }

    fn exercise(cache: &Cache) {
        assert_eq!(cache.get::<Entry>("book").unwrap(), None);
        assert!(!cache.exists("book").unwrap());

        cache.set("book", &entry()).unwrap();
        assert!(cache.exists("book").unwrap());
        assert_eq!(cache.get::<Entry>("book").unwrap(), Some(entry()));

        cache.set("cart", &vec![1, 2]).unwrap();
        assert_eq!(cache.keys().unwrap(), vec!["book".to_string(), "cart".to_string()]);

        cache.delete("book").unwrap();
        cache.delete("book").unwrap();
        assert_eq!(cache.get::<Entry>("book").unwrap(), None);
    }

    #[test]
    fn test_memory_backend() {
        exercise(&Cache::in_memory());
    }

    #[test]
    fn test_dir_backend() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&Cache::open_dir(dir.path()).unwrap());
    }

    #[test]
    fn test_dir_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        Cache::open_dir(dir.path()).unwrap().set("auth", &entry()).unwrap();

        let reopened = Cache::open_dir(dir.path()).unwrap();
        assert_eq!(reopened.get::<Entry>("auth").unwrap(), Some(entry()));
    }

    #[test]
    fn test_namespaced_keys_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        cache.set("cart:7", &1u8).unwrap();
        assert_eq!(cache.keys().unwrap(), vec!["cart:7".to_string()]);
        assert_eq!(cache.get::<u8>("cart:7").unwrap(), Some(1));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = Cache::in_memory();
        let other = cache.clone();
        cache.set("k", &1u8).unwrap();
        assert_eq!(other.get::<u8>("k").unwrap(), Some(1));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        assert!(matches!(
            cache.set("../escape", &1u8),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(cache.get::<u8>(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(cache.set("a__b", &1u8), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cart.json"), b"{not json").unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();
        assert!(matches!(
            cache.get::<Entry>("cart"),
            Err(StoreError::SerializeError(_))
        ));
    }
}
