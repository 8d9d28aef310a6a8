//! Accessor factory
//!
//! [`Preferences`] hands out typed accessors bound to one store. Every
//! constructor checks that the store can hold the codec's native type and
//! fails fast with [`Error::UnsupportedType`] otherwise. Construction never
//! reads or writes the store.

use crate::codec::{
    BoolCodec, Codec, EnumCodec, FloatCodec, IntCodec, JsonCodec, LongCodec, Nullable,
    PreferenceEnum, StringCodec, StringSetCodec,
};
use crate::error::{Error, Result};
use crate::observable::ObservablePreference;
use crate::preference::{Preference, PreferenceDescriptor};
use crate::store::{MemoryStore, PreferenceStore};
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Factory of typed accessors over a shared store
///
/// # Example
///
/// ```
/// use rprefs::{MemoryStore, Preferences};
/// use std::sync::Arc;
///
/// let prefs = Preferences::new(Arc::new(MemoryStore::new()));
///
/// let dark_mode = prefs.boolean("dark_mode", false)?;
/// let nickname = prefs.string_opt("nickname")?;
///
/// dark_mode.set(true)?;
/// assert!(dark_mode.get()?);
/// assert_eq!(nickname.get()?, None);
/// # Ok::<(), rprefs::Error>(())
/// ```
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl Preferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Factory over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Bind a prepared descriptor to this factory's store
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the store cannot hold the
    /// codec's native type.
    pub fn bind<C: Codec>(&self, descriptor: PreferenceDescriptor<C>) -> Result<Preference<C>> {
        let codec = descriptor.codec();
        let native_type = codec.native_type();
        if !self.store.supports(native_type) {
            return Err(Error::UnsupportedType {
                key: descriptor.key().to_string(),
                type_name: codec.type_name().to_string(),
                native_type,
            });
        }
        debug!(
            "Bound preference '{}' as {} on {} store",
            descriptor.key(),
            native_type,
            self.store.backend_name()
        );
        Ok(Preference::new(descriptor, Arc::clone(&self.store)))
    }

    /// Accessor with an arbitrary codec
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the store cannot hold the
    /// codec's native type.
    pub fn preference<C: Codec>(
        &self,
        key: impl Into<String>,
        codec: C,
        default: C::Value,
    ) -> Result<Preference<C>> {
        self.bind(PreferenceDescriptor::new(key, codec, default))
    }

    /// Optional accessor with an arbitrary codec
    ///
    /// `default` is what an absent key reads as; it may be `None` or an
    /// explicit value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the store cannot hold the
    /// codec's native type.
    pub fn nullable<C: Codec>(
        &self,
        key: impl Into<String>,
        codec: C,
        default: Option<C::Value>,
    ) -> Result<Preference<Nullable<C>>> {
        self.preference(key, Nullable(codec), default)
    }

    /// Bind a descriptor straight into an observable accessor
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the store cannot hold the
    /// codec's native type.
    pub fn observable<C: Codec>(
        &self,
        descriptor: PreferenceDescriptor<C>,
    ) -> Result<ObservablePreference<C>>
    where
        C::Value: PartialEq,
    {
        self.bind(descriptor).map(Preference::observable)
    }

    // -------------------------------------------------------------------------
    // Typed shorthands
    // -------------------------------------------------------------------------

    pub fn boolean(&self, key: impl Into<String>, default: bool) -> Result<Preference<BoolCodec>> {
        self.preference(key, BoolCodec, default)
    }

    pub fn int(&self, key: impl Into<String>, default: i32) -> Result<Preference<IntCodec>> {
        self.preference(key, IntCodec, default)
    }

    pub fn long(&self, key: impl Into<String>, default: i64) -> Result<Preference<LongCodec>> {
        self.preference(key, LongCodec, default)
    }

    pub fn float(&self, key: impl Into<String>, default: f32) -> Result<Preference<FloatCodec>> {
        self.preference(key, FloatCodec, default)
    }

    pub fn string(
        &self,
        key: impl Into<String>,
        default: impl Into<String>,
    ) -> Result<Preference<StringCodec>> {
        self.preference(key, StringCodec, default.into())
    }

    pub fn string_set(
        &self,
        key: impl Into<String>,
        default: BTreeSet<String>,
    ) -> Result<Preference<StringSetCodec>> {
        self.preference(key, StringSetCodec, default)
    }

    /// Enumeration stored by variant name
    pub fn enumeration<E: PreferenceEnum>(
        &self,
        key: impl Into<String>,
        default: E,
    ) -> Result<Preference<EnumCodec<E>>> {
        self.preference(key, EnumCodec::new(), default)
    }

    /// Any serde type stored as JSON text
    pub fn json<T>(&self, key: impl Into<String>, default: T) -> Result<Preference<JsonCodec<T>>>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.preference(key, JsonCodec::new(), default)
    }

    // -------------------------------------------------------------------------
    // Optional shorthands, absent reads as None
    // -------------------------------------------------------------------------

    pub fn boolean_opt(&self, key: impl Into<String>) -> Result<Preference<Nullable<BoolCodec>>> {
        self.nullable(key, BoolCodec, None)
    }

    pub fn int_opt(&self, key: impl Into<String>) -> Result<Preference<Nullable<IntCodec>>> {
        self.nullable(key, IntCodec, None)
    }

    pub fn long_opt(&self, key: impl Into<String>) -> Result<Preference<Nullable<LongCodec>>> {
        self.nullable(key, LongCodec, None)
    }

    pub fn float_opt(&self, key: impl Into<String>) -> Result<Preference<Nullable<FloatCodec>>> {
        self.nullable(key, FloatCodec, None)
    }

    pub fn string_opt(&self, key: impl Into<String>) -> Result<Preference<Nullable<StringCodec>>> {
        self.nullable(key, StringCodec, None)
    }

    pub fn string_set_opt(
        &self,
        key: impl Into<String>,
    ) -> Result<Preference<Nullable<StringSetCodec>>> {
        self.nullable(key, StringSetCodec, None)
    }

    pub fn enumeration_opt<E: PreferenceEnum>(
        &self,
        key: impl Into<String>,
    ) -> Result<Preference<Nullable<EnumCodec<E>>>> {
        self.nullable(key, EnumCodec::new(), None)
    }

    pub fn json_opt<T>(&self, key: impl Into<String>) -> Result<Preference<Nullable<JsonCodec<T>>>>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.nullable(key, JsonCodec::new(), None)
    }
}
