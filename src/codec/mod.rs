//! Typed codecs between domain values and native store values
//!
//! A [`Codec`] decides how one Rust type is laid out in a
//! [`PreferenceStore`]. Codecs are plain values chosen at compile time; there
//! is no runtime type lookup.
//!
//! | Codec               | Rust type          | Stored as  |
//! |---------------------|--------------------|------------|
//! | [`BoolCodec`]       | `bool`             | bool       |
//! | [`IntCodec`]        | `i32`              | int        |
//! | [`LongCodec`]       | `i64`              | long       |
//! | [`FloatCodec`]      | `f32`              | float      |
//! | [`StringCodec`]     | `String`           | string     |
//! | [`StringSetCodec`]  | `BTreeSet<String>` | string set |
//! | [`EnumCodec<E>`]    | `E`                | variant name as string |
//! | [`JsonCodec<T>`]    | `T`                | JSON text as string |
//! | [`Nullable<C>`]     | `Option<C::Value>` | same as `C`, `None` removes the key |
//!
//! Reading never fails because of the stored data itself. A missing key, a
//! value of the wrong native type, an unknown enum name or JSON that no longer
//! matches `T` all yield the preference's default.

mod enumeration;
mod json;
mod primitive;

pub use enumeration::{EnumCodec, PreferenceEnum};
pub use json::JsonCodec;
pub use primitive::{BoolCodec, FloatCodec, IntCodec, LongCodec, StringCodec, StringSetCodec};

use crate::error::Result;
use crate::store::{Editor, NativeType, NativeValue, PreferenceStore};
use log::warn;

/// Bidirectional mapping between a Rust type and a native store value
pub trait Codec: Send + Sync + 'static {
    /// Domain type exposed to callers
    type Value: Clone + Send + Sync + 'static;

    /// Native type this codec stores
    fn native_type(&self) -> NativeType;

    /// Name of the domain type, for diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self::Value>()
    }

    /// Turn a raw stored value into the domain type
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) or
    /// [`Error::TypeMismatch`](crate::Error::TypeMismatch) if `raw` cannot be
    /// interpreted.
    fn decode(&self, key: &str, raw: NativeValue) -> Result<Self::Value>;

    /// Turn a domain value into its stored form
    ///
    /// [`write`](Codec::write) is the entry point for storing values; codecs
    /// whose values may be stored as a removal override it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    fn encode(&self, value: &Self::Value) -> Result<NativeValue>;

    /// Read `key` from `store`, falling back to `default`
    ///
    /// # Errors
    ///
    /// Only store access failures are returned; decoding problems are logged
    /// and replaced by `default`.
    fn read(
        &self,
        store: &dyn PreferenceStore,
        key: &str,
        default: &Self::Value,
    ) -> Result<Self::Value> {
        let Some(raw) = store.get(key)? else {
            return Ok(default.clone());
        };
        match self.decode(key, raw) {
            Ok(value) => Ok(value),
            Err(e) if e.is_recoverable_decode() => {
                warn!("Falling back to default for '{key}': {e}");
                Ok(default.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Value a read returns right after `value` was written
    ///
    /// Identity unless writing `value` removes the key.
    fn read_back(&self, value: Self::Value, _default: &Self::Value) -> Self::Value {
        value
    }

    /// Stage `value` under `key` on `editor`
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn write(&self, editor: &mut Editor<'_>, key: &str, value: &Self::Value) -> Result<()> {
        editor.put_native(key, self.encode(value)?);
        Ok(())
    }
}

/// Optional variant of any codec
///
/// Absence of the key reads as the preference's default, which is either
/// `None` or an explicit `Some(..)`. Writing `None` removes the key instead of
/// storing a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nullable<C>(pub C);

impl<C: Codec> Nullable<C> {
    pub fn new(inner: C) -> Self {
        Self(inner)
    }

    /// The wrapped codec
    pub fn inner(&self) -> &C {
        &self.0
    }
}

impl<C: Codec> Codec for Nullable<C> {
    type Value = Option<C::Value>;

    fn native_type(&self) -> NativeType {
        self.0.native_type()
    }

    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn decode(&self, key: &str, raw: NativeValue) -> Result<Self::Value> {
        self.0.decode(key, raw).map(Some)
    }

    fn encode(&self, value: &Self::Value) -> Result<NativeValue> {
        match value {
            Some(inner) => self.0.encode(inner),
            None => Err(crate::Error::NullEncode {
                type_name: self.0.type_name().to_string(),
            }),
        }
    }

    fn read_back(&self, value: Self::Value, default: &Self::Value) -> Self::Value {
        value.or_else(|| default.clone())
    }

    fn write(&self, editor: &mut Editor<'_>, key: &str, value: &Self::Value) -> Result<()> {
        match value {
            Some(inner) => self.0.write(editor, key, inner),
            None => {
                editor.remove(key);
                Ok(())
            }
        }
    }
}
