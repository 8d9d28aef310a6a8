//! In-memory store, not persisted

use super::{Edit, NativeType, NativeValue, PreferenceStore};
use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// In-memory preference storage
pub struct MemoryStore {
    values: RwLock<HashMap<String, NativeValue>>,
    supported: Option<HashSet<NativeType>>,
}

impl MemoryStore {
    /// Create an empty store accepting every native type
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            supported: None,
        }
    }

    /// Create an empty store that only accepts the given native types
    ///
    /// Useful to emulate restricted platform stores.
    #[must_use]
    pub fn with_types(types: impl IntoIterator<Item = NativeType>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            supported: Some(types.into_iter().collect()),
        }
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read_recovered().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for MemoryStore {
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.values.read_recovered()?.contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<NativeValue>> {
        Ok(self.values.read_recovered()?.get(key).cloned())
    }

    fn commit(&self, edits: Vec<Edit>) -> Result<()> {
        // Validate everything before touching the map
        for edit in &edits {
            if let Edit::Put { key, value } = edit {
                if !self.supports(value.native_type()) {
                    return Err(Error::Persistence {
                        key: key.clone(),
                        reason: format!("memory store does not accept {}", value.native_type()),
                    });
                }
            }
        }

        let mut values = self.values.write_recovered()?;
        for edit in edits {
            match edit {
                Edit::Put { key, value } => {
                    values.insert(key, value);
                }
                Edit::Remove { key } => {
                    values.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read_recovered()?.keys().cloned().collect())
    }

    fn supports(&self, native_type: NativeType) -> bool {
        self.supported
            .as_ref()
            .is_none_or(|types| types.contains(&native_type))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_put_and_get() {
        let store = MemoryStore::new();
        let dyn_store: &dyn PreferenceStore = &store;

        dyn_store
            .edit()
            .put_bool("flag", true)
            .put_long("big", i64::MAX)
            .commit()
            .unwrap();

        assert_eq!(store.get_bool("flag").unwrap(), Some(true));
        assert_eq!(store.get_long("big").unwrap(), Some(i64::MAX));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_memory_remove() {
        let store = MemoryStore::new();
        let dyn_store: &dyn PreferenceStore = &store;

        dyn_store.edit().put_string("key", "value").commit().unwrap();
        assert!(store.contains("key").unwrap());

        dyn_store.edit().remove("key").commit().unwrap();
        assert!(!store.contains("key").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restricted_store_rejects_whole_commit() {
        let store = MemoryStore::with_types([NativeType::String]);
        let dyn_store: &dyn PreferenceStore = &store;

        assert!(store.supports(NativeType::String));
        assert!(!store.supports(NativeType::StringSet));

        let err = dyn_store
            .edit()
            .put_string("a", "ok")
            .put_int("b", 1)
            .commit()
            .unwrap_err();

        assert!(err.is_persistence_error());
        // Nothing from the rejected batch is applied
        assert!(!store.contains("a").unwrap());
    }

    #[test]
    fn test_memory_list_keys() {
        let store = MemoryStore::new();
        let dyn_store: &dyn PreferenceStore = &store;

        dyn_store.edit().put_int("a", 1).put_int("b", 2).commit().unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
