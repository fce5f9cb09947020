//! Wire scalars: booleans, fixed-width integers, floats, strings and blobs.

use super::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Scalars whose rule is a single [`Decoder`] read.
macro_rules! wire_scalar {
    ($($ty:ty => $read:ident),+ $(,)?) => {$(
        impl Decode for $ty {
            #[inline]
            fn decode_shape(
                decoder: &mut Decoder<'_>,
                _explicit_length: Option<usize>,
            ) -> Result<Self, DecodeError> {
                decoder.$read()
            }

            #[inline]
            fn zero() -> Self {
                <$ty>::default()
            }
        }
    )+};
}

wire_scalar! {
    bool => read_bool,
    u8 => read_u8,
    i8 => read_i8,
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
    String => read_string,
}

/// Platform-width integers have no wire rule, their size would depend on the
/// machine that wrote them.
macro_rules! unsupported_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl Decode for $ty {
            fn decode_shape(
                _decoder: &mut Decoder<'_>,
                _explicit_length: Option<usize>,
            ) -> Result<Self, DecodeError> {
                Err(DecodeError::UnsupportedShape {
                    type_name: stringify!($ty),
                })
            }

            fn zero() -> Self {
                0
            }
        }
    )+};
}

unsupported_scalar!(usize, isize);

impl Decode for bytes::Bytes {
    #[inline]
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        _explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError> {
        decoder.read_byte_array().map(bytes::Bytes::copy_from_slice)
    }

    #[inline]
    fn zero() -> Self {
        bytes::Bytes::new()
    }
}

/// A length-prefixed string decoded leniently: ill-formed UTF-8 sequences are
/// replaced with `U+FFFD` instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SafeString(pub String);

impl SafeString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::ops::Deref for SafeString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for SafeString {
    fn from(s: &str) -> Self {
        SafeString(s.to_owned())
    }
}

impl From<String> for SafeString {
    fn from(s: String) -> Self {
        SafeString(s)
    }
}

impl core::fmt::Display for SafeString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Decode for SafeString {
    #[inline]
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        _explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError> {
        decoder.read_safe_string().map(SafeString)
    }

    #[inline]
    fn zero() -> Self {
        SafeString::default()
    }
}
