//! Structured values stored as JSON text

use super::Codec;
use crate::error::{Error, Result};
use crate::store::{NativeType, NativeValue};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Codec storing any serde type as a JSON string
///
/// Stored text that no longer deserializes into `T` (a field was added, a
/// type changed) decodes as an error and the preference falls back to its
/// default.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonCodec<T> {}

impl<T> std::fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonCodec<{}>", std::any::type_name::<T>())
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Value = T;

    fn native_type(&self) -> NativeType {
        NativeType::String
    }

    fn decode(&self, key: &str, raw: NativeValue) -> Result<T> {
        let NativeValue::String(text) = raw else {
            return Err(Error::TypeMismatch {
                key: key.to_string(),
                expected: NativeType::String.name().to_string(),
                actual: raw.native_type().name().to_string(),
            });
        };
        serde_json::from_str(&text).map_err(|e| Error::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn encode(&self, value: &T) -> Result<NativeValue> {
        Ok(NativeValue::String(serde_json::to_string(value)?))
    }
}
