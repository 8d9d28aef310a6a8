//! Typed accessor bound to a single key

use crate::codec::Codec;
use crate::error::Result;
use crate::observable::ObservablePreference;
use crate::store::{Editor, PreferenceStore};
use std::fmt;
use std::sync::Arc;

/// Key, default and codec of a preference, not yet bound to a store
///
/// Descriptors are cheap to build and can live in constants or be shared
/// between several stores via [`Preferences::bind`](crate::Preferences::bind).
pub struct PreferenceDescriptor<C: Codec> {
    key: String,
    default: C::Value,
    codec: C,
}

impl<C: Codec> PreferenceDescriptor<C> {
    pub fn new(key: impl Into<String>, codec: C, default: C::Value) -> Self {
        Self {
            key: key.into(),
            default,
            codec,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> &C::Value {
        &self.default
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: Codec + Clone> Clone for PreferenceDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            default: self.default.clone(),
            codec: self.codec.clone(),
        }
    }
}

impl<C: Codec> fmt::Debug for PreferenceDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceDescriptor")
            .field("key", &self.key)
            .field("type", &self.codec.type_name())
            .field("native_type", &self.codec.native_type())
            .finish()
    }
}

/// Typed read/write accessor for one key of a store
///
/// Reading an absent or undecodable value yields the default. Writing
/// commits immediately; a failed commit leaves the store untouched and is
/// returned as [`Error::Persistence`](crate::Error::Persistence).
///
/// # Example
///
/// ```
/// use rprefs::Preferences;
///
/// let prefs = Preferences::in_memory();
/// let age = prefs.long_opt("age_key")?;
///
/// assert_eq!(age.get()?, None);
/// age.set(Some(26))?;
/// assert_eq!(age.get()?, Some(26));
/// age.set(None)?;
/// assert!(!age.is_set()?);
/// # Ok::<(), rprefs::Error>(())
/// ```
pub struct Preference<C: Codec> {
    descriptor: Arc<PreferenceDescriptor<C>>,
    store: Arc<dyn PreferenceStore>,
}

impl<C: Codec> Clone for Preference<C> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            store: Arc::clone(&self.store),
        }
    }
}

impl<C: Codec> fmt::Debug for Preference<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preference")
            .field("descriptor", &self.descriptor)
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl<C: Codec> Preference<C> {
    /// Bind a descriptor to a store
    ///
    /// No support check happens here; [`Preferences`](crate::Preferences)
    /// does that before calling in.
    pub(crate) fn new(descriptor: PreferenceDescriptor<C>, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            store,
        }
    }

    /// Current value, or the default if the key is absent or undecodable
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn get(&self) -> Result<C::Value> {
        let d = &self.descriptor;
        d.codec.read(self.store.as_ref(), &d.key, &d.default)
    }

    /// Store `value` under this preference's key
    ///
    /// For nullable preferences, `None` removes the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`](crate::Error::Persistence) if the store
    /// rejects the write.
    pub fn set(&self, value: C::Value) -> Result<()> {
        let d = &self.descriptor;
        let mut editor = Editor::new(self.store.as_ref());
        d.codec
            .write(&mut editor, &d.key, &value)
            .map_err(|e| e.into_persistence(&d.key))?;
        editor.commit()
    }

    /// Remove the key so the default is read again
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`](crate::Error::Persistence) if the store
    /// rejects the removal.
    pub fn reset(&self) -> Result<()> {
        Editor::new(self.store.as_ref())
            .remove(&self.descriptor.key)
            .commit()
    }

    /// Whether the store currently holds a value for this key
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_set(&self) -> Result<bool> {
        self.store.contains(&self.descriptor.key)
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn default_value(&self) -> &C::Value {
        &self.descriptor.default
    }

    pub fn descriptor(&self) -> &PreferenceDescriptor<C> {
        &self.descriptor
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Turn this accessor into one that notifies subscribers on change
    #[must_use]
    pub fn observable(self) -> ObservablePreference<C>
    where
        C::Value: PartialEq,
    {
        ObservablePreference::new(self)
    }
}
