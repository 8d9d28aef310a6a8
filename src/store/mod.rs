//! Key-value store abstraction
//!
//! Preferences never talk to a platform store directly. They go through the
//! [`PreferenceStore`] trait, which models an untyped map from string keys to
//! a small set of native primitive types:
//!
//! - **Memory**: [`MemoryStore`], process-local, useful for tests and embedding
//! - **File**: [`FileStore`], one serialized file rewritten atomically on commit
//!
//! Writes are staged on an [`Editor`] and handed to the store in one
//! [`PreferenceStore::commit`] call.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Primitive types a store can hold natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Bool,
    Int,
    Long,
    Float,
    String,
    StringSet,
}

impl NativeType {
    /// Every native type, in declaration order
    pub const ALL: [NativeType; 6] = [
        NativeType::Bool,
        NativeType::Int,
        NativeType::Long,
        NativeType::Float,
        NativeType::String,
        NativeType::StringSet,
    ];

    /// Human readable name used in error messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NativeType::Bool => "bool",
            NativeType::Int => "int",
            NativeType::Long => "long",
            NativeType::Float => "float",
            NativeType::String => "string",
            NativeType::StringSet => "string set",
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value as the store sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum NativeValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    StringSet(BTreeSet<String>),
}

impl NativeValue {
    /// The native type of this value
    #[must_use]
    pub fn native_type(&self) -> NativeType {
        match self {
            NativeValue::Bool(_) => NativeType::Bool,
            NativeValue::Int(_) => NativeType::Int,
            NativeValue::Long(_) => NativeType::Long,
            NativeValue::Float(_) => NativeType::Float,
            NativeValue::String(_) => NativeType::String,
            NativeValue::StringSet(_) => NativeType::StringSet,
        }
    }
}

/// One staged mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Put { key: String, value: NativeValue },
    Remove { key: String },
}

impl Edit {
    /// Key touched by this edit
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Edit::Put { key, .. } | Edit::Remove { key } => key,
        }
    }
}

/// Trait for key-value store implementations
///
/// Implementations are responsible for their own thread safety. A commit must
/// either apply every staged edit durably or none of them.
pub trait PreferenceStore: Send + Sync {
    /// Check if a key is present
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn contains(&self, key: &str) -> Result<bool>;

    /// Retrieve the raw value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<NativeValue>>;

    /// Apply staged edits
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the edits could not be made durable.
    /// Nothing is applied in that case.
    fn commit(&self, edits: Vec<Edit>) -> Result<()>;

    /// List all stored keys
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;

    /// Whether this store can hold values of the given native type
    fn supports(&self, _native_type: NativeType) -> bool {
        true
    }

    /// Backend name for logging/debugging
    fn backend_name(&self) -> &'static str;

    /// Read a boolean
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        typed(key, NativeType::Bool, self.get(key)?, |v| match v {
            NativeValue::Bool(b) => Some(b),
            _ => None,
        })
    }

    /// Read a 32-bit integer
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        typed(key, NativeType::Int, self.get(key)?, |v| match v {
            NativeValue::Int(i) => Some(i),
            _ => None,
        })
    }

    /// Read a 64-bit integer
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_long(&self, key: &str) -> Result<Option<i64>> {
        typed(key, NativeType::Long, self.get(key)?, |v| match v {
            NativeValue::Long(l) => Some(l),
            _ => None,
        })
    }

    /// Read a 32-bit float
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_float(&self, key: &str) -> Result<Option<f32>> {
        typed(key, NativeType::Float, self.get(key)?, |v| match v {
            NativeValue::Float(f) => Some(f),
            _ => None,
        })
    }

    /// Read a string
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        typed(key, NativeType::String, self.get(key)?, |v| match v {
            NativeValue::String(s) => Some(s),
            _ => None,
        })
    }

    /// Read a set of strings
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the key holds another type.
    fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>> {
        typed(key, NativeType::StringSet, self.get(key)?, |v| match v {
            NativeValue::StringSet(s) => Some(s),
            _ => None,
        })
    }
}

fn typed<T>(
    key: &str,
    expected: NativeType,
    value: Option<NativeValue>,
    extract: impl FnOnce(NativeValue) -> Option<T>,
) -> Result<Option<T>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let actual = value.native_type();
    extract(value).map(Some).ok_or_else(|| Error::TypeMismatch {
        key: key.to_string(),
        expected: expected.name().to_string(),
        actual: actual.name().to_string(),
    })
}

impl<'s> dyn PreferenceStore + 's {
    /// Start staging edits against this store
    pub fn edit(&self) -> Editor<'_> {
        Editor::new(self)
    }
}

/// Staging area for writes, finalized with [`Editor::commit`]
///
/// # Example
///
/// ```
/// use rprefs::{MemoryStore, PreferenceStore};
///
/// let store = MemoryStore::new();
/// let store: &dyn PreferenceStore = &store;
/// store.edit().put_int("launches", 3).remove("legacy").commit()?;
/// assert_eq!(store.get_int("launches")?, Some(3));
/// # Ok::<(), rprefs::Error>(())
/// ```
#[must_use = "staged edits are discarded unless committed"]
pub struct Editor<'a> {
    store: &'a dyn PreferenceStore,
    edits: Vec<Edit>,
}

impl<'a> Editor<'a> {
    /// Create an empty editor for `store`
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self {
            store,
            edits: Vec::new(),
        }
    }

    /// Stage a raw native value
    pub fn put_native(&mut self, key: &str, value: NativeValue) -> &mut Self {
        self.edits.push(Edit::Put {
            key: key.to_string(),
            value,
        });
        self
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.put_native(key, NativeValue::Bool(value))
    }

    pub fn put_int(&mut self, key: &str, value: i32) -> &mut Self {
        self.put_native(key, NativeValue::Int(value))
    }

    pub fn put_long(&mut self, key: &str, value: i64) -> &mut Self {
        self.put_native(key, NativeValue::Long(value))
    }

    pub fn put_float(&mut self, key: &str, value: f32) -> &mut Self {
        self.put_native(key, NativeValue::Float(value))
    }

    pub fn put_string(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.put_native(key, NativeValue::String(value.into()))
    }

    pub fn put_string_set(&mut self, key: &str, value: BTreeSet<String>) -> &mut Self {
        self.put_native(key, NativeValue::StringSet(value))
    }

    /// Stage removal of `key`
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.edits.push(Edit::Remove {
            key: key.to_string(),
        });
        self
    }

    /// Edits staged so far
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Hand the staged edits to the store
    ///
    /// Committing an empty editor does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the store rejects the write.
    pub fn commit(&mut self) -> Result<()> {
        if self.edits.is_empty() {
            return Ok(());
        }
        let edits = std::mem::take(&mut self.edits);
        log::debug!(
            "Committing {} edit(s) to {} store",
            edits.len(),
            self.store.backend_name()
        );
        let first_key = edits[0].key().to_string();
        self.store
            .commit(edits)
            .map_err(|e| e.into_persistence(&first_key))
    }
}
