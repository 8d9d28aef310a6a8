//! # rprefs - Rust Preferences
//!
//! Typed, observable accessors over a key-value preference store.
//!
//! ## Features
//!
//! - **Typed Accessors**: `bool`, `i32`, `i64`, `f32`, `String`, string sets, enums and any serde type
//! - **Nullable Preferences**: `Option` accessors where writing `None` removes the key
//! - **Graceful Decoding**: Unknown enum names and outdated JSON fall back to the default
//! - **Observable Preferences**: Replay-latest, deduplicated change streams with callbacks or a blocking iterator
//! - **Pluggable Stores**: In-memory store, or a file store in JSON, TOML (`toml` feature) or YAML (`yaml` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use rprefs::Preferences;
//!
//! let prefs = Preferences::in_memory();
//!
//! let token = prefs.string("token_key", "")?;
//! assert_eq!(token.get()?, "");
//!
//! token.set("abc".to_string())?;
//! assert_eq!(token.get()?, "abc");
//! # Ok::<(), rprefs::Error>(())
//! ```
//!
//! ## Persisting to a File
//!
//! ```rust,no_run
//! use rprefs::{FileStore, FileStoreConfig, Preferences};
//! use std::sync::Arc;
//!
//! let config = FileStoreConfig::builder("my-app")
//!     .config_dir("~/.config/my-app")
//!     .secure_permissions()
//!     .build();
//! let prefs = Preferences::new(Arc::new(FileStore::open(config)?));
//!
//! let age = prefs.long_opt("age_key")?;
//! age.set(Some(26))?;
//! # Ok::<(), rprefs::Error>(())
//! ```
//!
//! ## Default Value Behavior
//!
//! A preference reads as its default whenever the store has nothing usable
//! for its key:
//!
//! - **Absent key**: default
//! - **Wrong native type**: default, with a warning logged
//! - **Unknown enum name / outdated JSON**: default, with a warning logged
//!
//! Nullable preferences default to `None` unless built with
//! [`Preferences::nullable`] and an explicit `Some(..)`. Writing `None`
//! always removes the key.
//!
//! ## Observing Changes
//!
//! ```rust
//! use rprefs::Preferences;
//!
//! let prefs = Preferences::in_memory();
//! let volume = prefs.int("volume", 5)?.observable();
//!
//! let changes = volume.changes()?;
//! volume.set(7)?;
//! volume.set(7)?;
//!
//! let seen: Vec<i32> = changes.try_iter().collect();
//! assert_eq!(seen, [5, 7]);
//! # Ok::<(), rprefs::Error>(())
//! ```
//!
//! Subscribers only hear about writes made through the observable accessor.
//! Call [`ObservablePreference::refresh`] after changing the store by other
//! means.

// Core modules
pub mod codec;
mod error;
mod observable;
mod preference;
mod preferences;
pub mod storage;
pub mod store;
mod sync;

// Grouped modules
pub mod config;

// Re-exports from core
pub use codec::{
    BoolCodec, Codec, EnumCodec, FloatCodec, IntCodec, JsonCodec, LongCodec, Nullable,
    PreferenceEnum, StringCodec, StringSetCodec,
};
pub use error::{Error, Result};
pub use observable::{Changes, ObservablePreference, Subscription};
pub use preference::{Preference, PreferenceDescriptor};
pub use preferences::Preferences;
pub use storage::{JsonStorage, StorageBackend};
pub use store::{Edit, Editor, FileStore, MemoryStore, NativeType, NativeValue, PreferenceStore};

#[cfg(feature = "toml")]
pub use storage::TomlStorage;
#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

// Re-exports from config
pub use config::{FileStoreConfig, FileStoreConfigBuilder};

// Derive macro re-export (requires `derive` feature)
/// Derive macro for [`PreferenceEnum`] on enums with unit variants.
///
/// # Example
///
/// ```rust,ignore
/// use rprefs::{DerivePreferenceEnum, PreferenceEnum};
///
/// #[derive(Debug, Clone, Copy, PartialEq, DerivePreferenceEnum)]
/// enum Theme {
///     Light,
///     #[preference(name = "night")]
///     Dark,
/// }
///
/// assert_eq!(Theme::Dark.name(), "night");
/// ```
#[cfg(feature = "derive")]
pub use rprefs_derive::PreferenceEnum as DerivePreferenceEnum;
