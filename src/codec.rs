//! Type-driven dispatch from a target type to its wire rule.
//!
//! Every decodable type implements [`Decode`]. The shape of the type picks the
//! rule: scalars read straight from the [`Decoder`], fixed arrays and
//! sequences recurse per element, records go through
//! [`crate::record::decode_record`], and wrappers (`Option`, `Box`, `Rc`,
//! `Arc`) forward to the type they wrap.

mod scalar;
mod sequence;
mod varint;
mod wide;
mod wrappers;

use crate::decoder::Decoder;
use crate::error::DecodeError;

pub use scalar::SafeString;
pub use varint::{Varint16, Varint32, Varint64, Varuint16, Varuint32, Varuint64};
pub use wide::{Float128, Int128, Uint128};

/// Per-call decode settings.
///
/// Options apply to a single value. They are not inherited by the elements
/// of a sequence or the fields of a record, the record decoder builds a fresh
/// option for each field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOption {
    /// Expect a one-byte presence flag before the value, `0` means absent.
    pub optional: bool,
    /// Element count to use for a sequence instead of reading a length prefix.
    pub explicit_length: Option<usize>,
}

impl DecodeOption {
    /// An option that expects a presence byte.
    pub const fn optional() -> Self {
        DecodeOption {
            optional: true,
            explicit_length: None,
        }
    }

    /// Use `len` as the sequence element count.
    pub const fn with_length(mut self, len: usize) -> Self {
        self.explicit_length = Some(len);
        self
    }
}

/// A type that can be decoded from the binary format.
///
/// Implementors provide [`Decode::decode_shape`], the rule for their shape,
/// and [`Decode::zero`], the value an absent optional decodes to. The
/// provided [`Decode::decode_with`] applies the [`DecodeOption`] around them.
pub trait Decode: Sized {
    /// Set when the type owns its entire wire representation.
    ///
    /// Self-decoding types are handed the decoder as-is: the presence byte of
    /// an optional field is not read for them. Wrappers report the value of
    /// the type they wrap, so the capability is found through any number of
    /// `Option`/`Box`/`Rc`/`Arc` layers. See [`UnmarshalBinary`].
    const SELF_DECODING: bool = false;

    /// Decode a value, honoring `option`.
    #[inline]
    fn decode_with(decoder: &mut Decoder<'_>, option: DecodeOption) -> Result<Self, DecodeError> {
        if option.optional && !Self::SELF_DECODING && !decoder.read_presence()? {
            tracing::debug!(
                type_name = core::any::type_name::<Self>(),
                "skipping optional value"
            );
            return Ok(Self::zero());
        }
        Self::decode_shape(decoder, option.explicit_length)
    }

    /// Decode a value according to the shape of `Self`.
    ///
    /// `explicit_length` is only meaningful to sequences, everything else
    /// ignores it.
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError>;

    /// The zero/empty value of `Self`.
    fn zero() -> Self;
}

/// A type that parses its own wire representation.
///
/// The implementation receives the shared [`Decoder`] and must consume
/// exactly the bytes its format requires, nothing checks how many it took.
/// Hook a type up to generic dispatch with [`impl_decode_via_unmarshal!`].
///
/// ```ignore
/// #[derive(Default)]
/// struct Symbol { precision: u8, code: [u8; 7] }
///
/// impl fcbin::UnmarshalBinary for Symbol {
///     fn unmarshal_binary(decoder: &mut fcbin::Decoder<'_>) -> Result<Self, fcbin::DecodeError> {
///         let raw = decoder.read_array::<8>()?;
///         let mut code = [0u8; 7];
///         code.copy_from_slice(&raw[1..]);
///         Ok(Symbol { precision: raw[0], code })
///     }
/// }
///
/// fcbin::impl_decode_via_unmarshal!(Symbol);
/// ```
pub trait UnmarshalBinary: Sized {
    fn unmarshal_binary(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

/// Implements [`Decode`] for types that implement [`UnmarshalBinary`] and
/// [`Default`], marking them as self-decoding.
#[macro_export]
macro_rules! impl_decode_via_unmarshal {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Decode for $ty {
            const SELF_DECODING: bool = true;

            #[inline]
            fn decode_shape(
                decoder: &mut $crate::Decoder<'_>,
                _explicit_length: ::core::option::Option<usize>,
            ) -> ::core::result::Result<Self, $crate::DecodeError> {
                <$ty as $crate::UnmarshalBinary>::unmarshal_binary(decoder)
            }

            #[inline]
            fn zero() -> Self {
                <$ty as ::core::default::Default>::default()
            }
        }
    )+};
}
