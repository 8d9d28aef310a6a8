//! Enumerations stored by variant name

use super::Codec;
use crate::error::{Error, Result};
use crate::store::{NativeType, NativeValue};
use std::marker::PhantomData;

/// Enumeration with a stable symbolic name per variant
///
/// The name is what ends up in the store, so renaming a variant breaks
/// existing data unless the old name is kept. With the `derive` feature the
/// trait can be derived; `#[preference(name = "...")]` overrides the stored
/// name of a variant.
///
/// ```
/// use rprefs::PreferenceEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// impl PreferenceEnum for Theme {
///     fn name(&self) -> &'static str {
///         match self {
///             Theme::Light => "Light",
///             Theme::Dark => "Dark",
///         }
///     }
///
///     fn variants() -> &'static [Self] {
///         &[Theme::Light, Theme::Dark]
///     }
/// }
///
/// assert_eq!(Theme::from_name("Dark"), Some(Theme::Dark));
/// assert_eq!(Theme::from_name("Sepia"), None);
/// ```
pub trait PreferenceEnum: Sized + Clone + Send + Sync + 'static {
    /// Stored name of this variant
    fn name(&self) -> &'static str;

    /// All variants, in declaration order
    fn variants() -> &'static [Self];

    /// Variant whose name is exactly `name`
    fn from_name(name: &str) -> Option<Self> {
        Self::variants().iter().find(|v| v.name() == name).cloned()
    }
}

/// Codec storing a [`PreferenceEnum`] as its variant name
///
/// Names that match no variant decode as an error, which makes the
/// preference fall back to its default.
pub struct EnumCodec<E>(PhantomData<fn() -> E>);

impl<E> EnumCodec<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumCodec<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnumCodec<E> {}

impl<E> std::fmt::Debug for EnumCodec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EnumCodec<{}>", std::any::type_name::<E>())
    }
}

impl<E: PreferenceEnum> Codec for EnumCodec<E> {
    type Value = E;

    fn native_type(&self) -> NativeType {
        NativeType::String
    }

    fn decode(&self, key: &str, raw: NativeValue) -> Result<E> {
        let NativeValue::String(name) = raw else {
            return Err(Error::TypeMismatch {
                key: key.to_string(),
                expected: NativeType::String.name().to_string(),
                actual: raw.native_type().name().to_string(),
            });
        };
        E::from_name(&name).ok_or_else(|| Error::Decode {
            key: key.to_string(),
            reason: format!(
                "'{name}' is not a variant of {}",
                std::any::type_name::<E>()
            ),
        })
    }

    fn encode(&self, value: &E) -> Result<NativeValue> {
        Ok(NativeValue::String(value.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    impl PreferenceEnum for Level {
        fn name(&self) -> &'static str {
            match self {
                Level::Low => "low",
                Level::High => "HIGH",
            }
        }

        fn variants() -> &'static [Self] {
            &[Level::Low, Level::High]
        }
    }

    #[test]
    fn test_encode_uses_symbolic_name() {
        let codec = EnumCodec::<Level>::new();
        assert_eq!(
            codec.encode(&Level::High).unwrap(),
            NativeValue::String("HIGH".into())
        );
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        let codec = EnumCodec::<Level>::new();
        assert_eq!(codec.decode("k", NativeValue::String("low".into())).unwrap(), Level::Low);

        let err = codec
            .decode("k", NativeValue::String("high".into()))
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.is_recoverable_decode());
    }

    #[test]
    fn test_decode_wrong_native_type() {
        let codec = EnumCodec::<Level>::new();
        let err = codec.decode("k", NativeValue::Int(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
