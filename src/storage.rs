//! File formats for [`FileStore`](crate::FileStore)

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Trait for file format implementations
///
/// Serializes the whole preference map of a file store. JSON is always
/// available, TOML and YAML sit behind the `toml` and `yaml` features.
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "json", "toml")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and deserialize from file
    ///
    /// Returns `Ok(None)` if the file does not exist.
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        self.deserialize(&content).map(Some)
    }

    /// Serialize and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        self.write_with_mode(path, data, None)
    }

    /// Like [`write`](StorageBackend::write), with the file restricted to
    /// `mode` before it is renamed into place
    ///
    /// If the permissions cannot be set the target file is left untouched.
    /// `mode` is ignored on non-Unix platforms.
    fn write_with_mode<T: Serialize>(&self, path: &Path, data: &T, mode: Option<u32>) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        if let Some(mode) = mode {
            if let Err(e) = set_permissions(&temp_path, mode) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(e);
            }
        }

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(unix)]
pub(crate) fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
        Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// No-op on Windows (permissions managed via ACLs)
#[cfg(not(unix))]
pub(crate) fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default)
#[derive(Debug, Clone, Default)]
pub struct JsonStorage {
    pretty: bool,
}

impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(data).map_err(Error::from)
        } else {
            serde_json::to_string(data).map_err(Error::from)
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// TOML Storage Implementation
// =============================================================================

/// TOML storage backend
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl TomlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        toml::to_string_pretty(data).map_err(|e| Error::Parse(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// YAML Storage Implementation
// =============================================================================

/// YAML storage backend
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl YamlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::Parse(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_yaml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NativeValue;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample() -> BTreeMap<String, NativeValue> {
        let mut map = BTreeMap::new();
        map.insert("token_key".to_string(), NativeValue::String("abc".into()));
        map.insert("age_key".to_string(), NativeValue::Long(26));
        map
    }

    #[test]
    fn test_json_serialize_pretty() {
        let json = JsonStorage::new().serialize(&sample()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"token_key\""));
    }

    #[test]
    fn test_json_serialize_compact() {
        let json = JsonStorage::compact().serialize(&sample()).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_write_creates_parent_and_reads_back() {
        let storage = JsonStorage::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/prefs.json");

        storage.write(&path, &sample()).unwrap();
        let loaded: Option<BTreeMap<String, NativeValue>> = storage.read(&path).unwrap();

        assert_eq!(loaded, Some(sample()));
        assert!(!dir.path().join("nested/prefs.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_with_mode_lands_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let storage = JsonStorage::new();
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        storage.write(&path, &sample()).unwrap();
        storage.write_with_mode(&path, &sample(), Some(0o600)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!dir.path().join("prefs.json.tmp").exists());
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded: Option<BTreeMap<String, NativeValue>> = JsonStorage::new()
            .read(&dir.path().join("absent.json"))
            .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_corrupt_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<BTreeMap<String, NativeValue>>> = JsonStorage::new().read(&path);
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
