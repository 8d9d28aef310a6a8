//! Core configuration types for file stores

use std::path::PathBuf;

use crate::storage::{JsonStorage, StorageBackend};

/// Configuration for opening a [`FileStore`](crate::FileStore)
#[derive(Debug, Clone)]
pub struct FileStoreConfig<S: StorageBackend = JsonStorage> {
    /// Directory where the preferences file is stored
    pub config_dir: PathBuf,

    /// Filename for the preferences file (e.g., "preferences.json")
    pub file_name: String,

    /// File format
    pub storage: S,

    /// Restrict the directory to 0o700 and the file to 0o600 (Unix only)
    pub secure_permissions: bool,
}

impl<S: StorageBackend> FileStoreConfig<S> {
    /// Get the full path to the preferences file
    pub fn path(&self) -> PathBuf {
        self.config_dir.join(&self.file_name)
    }
}

impl FileStoreConfig<JsonStorage> {
    /// Create a new builder for FileStoreConfig
    ///
    /// # Example
    /// ```rust
    /// use rprefs::FileStoreConfig;
    ///
    /// let config = FileStoreConfig::builder("my-app")
    ///     .config_dir("~/.config/my-app")
    ///     .build();
    /// assert_eq!(config.file_name, "preferences.json");
    /// ```
    pub fn builder(app_name: impl Into<String>) -> FileStoreConfigBuilder {
        FileStoreConfigBuilder::new(app_name)
    }
}

/// Builder for creating FileStoreConfig with a fluent API
#[derive(Debug, Clone)]
pub struct FileStoreConfigBuilder {
    app_name: String,
    config_dir: Option<PathBuf>,
    file_name: Option<String>,
    pretty_json: bool,
    secure_permissions: bool,
}

impl FileStoreConfigBuilder {
    /// Create a new builder with the required app name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: None,
            file_name: None,
            pretty_json: true,
            secure_permissions: false,
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap_or(&path))
            } else {
                path
            }
        } else {
            path
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the preferences filename (default: "preferences.<extension>")
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Use compact JSON (no pretty printing)
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    /// Restrict permissions of the directory and file to the current user
    pub fn secure_permissions(mut self) -> Self {
        self.secure_permissions = true;
        self
    }

    /// Build a JSON configuration
    ///
    /// If `config_dir` is not set, uses the system config directory for the app.
    pub fn build(self) -> FileStoreConfig<JsonStorage> {
        let storage = if self.pretty_json {
            JsonStorage::new()
        } else {
            JsonStorage::compact()
        };
        self.build_with(storage)
    }

    /// Build a configuration for another file format
    ///
    /// # Example
    /// ```rust,ignore
    /// use rprefs::{FileStoreConfig, storage::TomlStorage};
    ///
    /// let config = FileStoreConfig::builder("my-app").build_with(TomlStorage::new());
    /// assert_eq!(config.file_name, "preferences.toml");
    /// ```
    pub fn build_with<S: StorageBackend>(self, storage: S) -> FileStoreConfig<S> {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        let file_name = self
            .file_name
            .unwrap_or_else(|| format!("preferences.{}", storage.extension()));

        FileStoreConfig {
            config_dir,
            file_name,
            storage,
            secure_permissions: self.secure_permissions,
        }
    }
}
