//! Codecs for the native primitive types

use super::Codec;
use crate::error::{Error, Result};
use crate::store::{NativeType, NativeValue};
use std::collections::BTreeSet;

macro_rules! native_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Codec for $name {
            type Value = $ty;

            fn native_type(&self) -> NativeType {
                NativeType::$variant
            }

            fn decode(&self, key: &str, raw: NativeValue) -> Result<$ty> {
                match raw {
                    NativeValue::$variant(value) => Ok(value),
                    other => Err(Error::TypeMismatch {
                        key: key.to_string(),
                        expected: NativeType::$variant.name().to_string(),
                        actual: other.native_type().name().to_string(),
                    }),
                }
            }

            fn encode(&self, value: &$ty) -> Result<NativeValue> {
                Ok(NativeValue::$variant(value.clone()))
            }
        }
    };
}

native_codec!(
    /// `bool` stored as a native boolean
    BoolCodec, bool, Bool
);
native_codec!(
    /// `i32` stored as a native int
    IntCodec, i32, Int
);
native_codec!(
    /// `i64` stored as a native long
    LongCodec, i64, Long
);
native_codec!(
    /// `f32` stored as a native float
    FloatCodec, f32, Float
);
native_codec!(
    /// `String` stored as-is
    StringCodec, String, String
);
native_codec!(
    /// Unordered string collection, kept sorted
    StringSetCodec, BTreeSet<String>, StringSet
);
