//! File-backed store
//!
//! The whole preference map lives in one file. It is loaded once when the
//! store is opened and kept in memory; every commit rewrites the file
//! atomically before the in-memory copy is replaced.

use super::{Edit, NativeValue, PreferenceStore};
use crate::config::FileStoreConfig;
use crate::error::{Error, Result};
use crate::storage::{set_permissions, JsonStorage, StorageBackend};
use crate::sync::RwLockExt;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Preference store persisted to a single file
///
/// # Example
///
/// ```rust,no_run
/// use rprefs::{FileStore, FileStoreConfig, Preferences};
/// use std::sync::Arc;
///
/// let config = FileStoreConfig::builder("my-app").build();
/// let store = Arc::new(FileStore::open(config)?);
/// let prefs = Preferences::new(store);
///
/// let launches = prefs.int("launches", 0)?;
/// launches.set(launches.get()? + 1)?;
/// # Ok::<(), rprefs::Error>(())
/// ```
pub struct FileStore<S: StorageBackend = JsonStorage> {
    path: PathBuf,
    storage: S,
    secure_permissions: bool,
    values: RwLock<BTreeMap<String, NativeValue>>,
}

impl<S: StorageBackend> FileStore<S> {
    /// Open the store described by `config`
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the file exists but cannot be decoded, or
    /// an I/O error if it cannot be read.
    pub fn open(config: FileStoreConfig<S>) -> Result<Self> {
        let path = config.path();
        let values = config.storage.read(&path)?.unwrap_or_default();

        if config.secure_permissions {
            ensure_secure_dir(&config.config_dir)?;
        }

        info!("Opened preference file at: {}", path.display());

        Ok(Self {
            path,
            storage: config.storage,
            secure_permissions: config.secure_permissions,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discard the in-memory copy and read the file again
    ///
    /// Call this if the file was modified externally. Observable preferences
    /// are not notified; use their `refresh` afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn reload(&self) -> Result<()> {
        let fresh = self.storage.read(&self.path)?.unwrap_or_default();
        *self.values.write_recovered()? = fresh;
        debug!("Reloaded preference file {}", self.path.display());
        Ok(())
    }
}

impl<S: StorageBackend> PreferenceStore for FileStore<S> {
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.values.read_recovered()?.contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<NativeValue>> {
        Ok(self.values.read_recovered()?.get(key).cloned())
    }

    fn commit(&self, edits: Vec<Edit>) -> Result<()> {
        let first_key = edits
            .first()
            .map(|e| e.key().to_string())
            .unwrap_or_default();

        // Writer lock is held across the file write so commits stay ordered
        let mut values = self.values.write_recovered()?;
        let mut next = values.clone();
        for edit in edits {
            match edit {
                Edit::Put { key, value } => {
                    next.insert(key, value);
                }
                Edit::Remove { key } => {
                    next.remove(&key);
                }
            }
        }

        // Permissions go on the temp file so a failure leaves the old file in place
        let mode = self.secure_permissions.then_some(0o600);
        self.storage
            .write_with_mode(&self.path, &next, mode)
            .map_err(|e| e.into_persistence(&first_key))?;

        *values = next;
        debug!("Wrote {} preference(s) to {}", values.len(), self.path.display());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read_recovered()?.keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

fn ensure_secure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })?;
    set_permissions(path, 0o700)
}

// =============================================================================
// Tests
// =============================================================================
