//! Variable-width integer types.
//!
//! Plain Rust integers decode with their fixed width. These wrappers select
//! the LEB128 rule instead: unsigned types use unsigned LEB128, signed types
//! use signed (sign-extending) LEB128. The 16 and 32-bit variants truncate
//! the 64-bit varint they read.

use super::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::record::SizeSource;

macro_rules! varint_type {
    ($(#[$meta:meta])* $name:ident($inner:ty) => $read:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl core::ops::Deref for $name {
            type Target = $inner;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Decode for $name {
            #[inline]
            fn decode_shape(
                decoder: &mut Decoder<'_>,
                _explicit_length: Option<usize>,
            ) -> Result<Self, DecodeError> {
                decoder.$read().map($name)
            }

            #[inline]
            fn zero() -> Self {
                $name(0)
            }
        }

        impl SizeSource for $name {
            #[inline]
            fn element_count(&self) -> usize {
                self.0.element_count()
            }
        }
    };
}

varint_type!(
    /// Unsigned LEB128, truncated to 16 bits.
    Varuint16(u16) => read_uvarint16
);
varint_type!(
    /// Unsigned LEB128, truncated to 32 bits.
    Varuint32(u32) => read_uvarint32
);
varint_type!(
    /// Unsigned LEB128.
    Varuint64(u64) => read_uvarint64
);
varint_type!(
    /// Signed LEB128, truncated to 16 bits.
    Varint16(i16) => read_varint16
);
varint_type!(
    /// Signed LEB128, truncated to 32 bits.
    Varint32(i32) => read_varint32
);
varint_type!(
    /// Signed LEB128.
    Varint64(i64) => read_varint64
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_slice;

    #[test]
    fn test_varuint_boundaries() {
        #[track_caller]
        fn test_case(bytes: &[u8], expected: u64) {
            let mut decoder = Decoder::new(bytes);
            assert_eq!(decoder.decode::<Varuint64>().unwrap(), Varuint64(expected));
            assert_eq!(decoder.position(), bytes.len());
        }

        test_case(&[0x00], 0);
        test_case(&[0x7f], 127);
        test_case(&[0x80, 0x01], 128);
        test_case(&[0xff, 0x7f], 16383);
        test_case(&[0x80, 0x80, 0x01], 16384);
        test_case(
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f],
            i64::MAX.unsigned_abs(),
        );
    }

    #[test]
    fn test_narrow_varints() {
        assert_eq!(from_slice::<Varuint32>(&[0xac, 0x02]).unwrap(), Varuint32(300));
        assert_eq!(from_slice::<Varuint16>(&[0xac, 0x02]).unwrap(), Varuint16(300));
        assert_eq!(from_slice::<Varint32>(&[0x7f]).unwrap(), Varint32(-1));
        assert_eq!(from_slice::<Varint16>(&[0x80, 0x7f]).unwrap(), Varint16(-128));
        assert_eq!(from_slice::<Varint64>(&[0x3f]).unwrap(), Varint64(63));
    }

    #[test]
    fn test_truncated_varint() {
        assert_eq!(
            from_slice::<Varuint32>(&[0xff, 0xff]),
            Err(DecodeError::MalformedVarint)
        );
        assert_eq!(from_slice::<Varint64>(&[]), Err(DecodeError::MalformedVarint));
    }
}
