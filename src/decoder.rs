//! Byte cursor and primitive readers.
//!
//! A [`Decoder`] owns a read position over an immutable byte slice. Every read
//! is bounds checked up front: on failure the position is left where it was,
//! on success it moves forward by exactly the bytes consumed. The position
//! never moves backwards.

use bytes::Buf;

use crate::codec::{Decode, DecodeOption};
use crate::codec::{Float128, Int128, Uint128};
use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::leb128::LebCodec;

/// Wire width, in bytes, of the fixed-size scalars.
pub mod type_size {
    pub const BOOL: usize = 1;
    pub const BYTE: usize = 1;

    pub const INT8: usize = 1;
    pub const INT16: usize = 2;
    pub const INT32: usize = 4;
    pub const INT64: usize = 8;

    pub const UINT8: usize = 1;
    pub const UINT16: usize = 2;
    pub const UINT32: usize = 4;
    pub const UINT64: usize = 8;
    pub const UINT128: usize = 16;

    pub const FLOAT32: usize = 4;
    pub const FLOAT64: usize = 8;
}

/// Reads values out of an in-memory buffer.
///
/// A decoder is meant for exactly one decode operation. It holds no state
/// outside of itself, so independent buffers can be decoded concurrently on
/// separate threads, each with its own decoder.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: u32,
    config: DecoderConfig,
}

static_assertions::assert_impl_all!(Decoder<'static>: Send, Sync);

/// Generates a little-endian fixed-width reader backed by [`bytes::Buf`].
macro_rules! fixed_width_reader {
    ($(#[$meta:meta])* $name:ident -> $ty:ty, $width:expr, $get:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            let mut raw = self.read_exact($width)?;
            let value = raw.$get();
            tracing::trace!(value, kind = stringify!($ty), "read fixed-width scalar");
            Ok(value)
        }
    };
}

/// Generates a varint reader narrowed to `$ty`.
macro_rules! varint_reader {
    ($(#[$meta:meta])* $name:ident -> $ty:ty) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            let (value, len) = <$ty as LebCodec>::decode_leb128(self.rest())?;
            self.pos += len;
            tracing::trace!(value, len, kind = stringify!($ty), "read varint");
            Ok(value)
        }
    };
}

impl<'a> Decoder<'a> {
    /// Create a decoder positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a decoder with an explicit [`DecoderConfig`].
    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Decoder {
            data,
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// The unread tail of the buffer.
    #[inline]
    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Decode a `T` at the current position.
    #[inline]
    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        self.decode_with_option(DecodeOption::default())
    }

    /// Decode a `T` at the current position, honoring `option`.
    ///
    /// This is the entry point every nested value goes through, so it is also
    /// where the nesting depth is bounded.
    pub fn decode_with_option<T: Decode>(
        &mut self,
        option: DecodeOption,
    ) -> Result<T, DecodeError> {
        let limit = self.config.depth_limit();
        if self.depth >= limit {
            return Err(DecodeError::RecursionLimitExceeded { limit });
        }

        tracing::trace!(
            type_name = core::any::type_name::<T>(),
            optional = option.optional,
            explicit_length = ?option.explicit_length,
            "decode type"
        );

        self.depth += 1;
        let result = T::decode_with(self, option);
        self.depth -= 1;
        result
    }

    /// Consume exactly `n` bytes.
    ///
    /// Fails with [`DecodeError::Underrun`] without moving the position if
    /// fewer than `n` bytes remain.
    #[inline]
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if available < n {
            return Err(DecodeError::underrun(n, available));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume exactly `N` bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let value = self.read_exact(type_size::BYTE)?[0];
        tracing::trace!(value, "read byte");
        Ok(value)
    }

    /// Reads one byte, `0` is `false` and anything else is `true`.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let value = self.read_exact(type_size::BOOL)?[0] != 0;
        tracing::trace!(value, "read bool");
        Ok(value)
    }

    /// Reads the presence byte that precedes an optional value.
    #[inline]
    pub(crate) fn read_presence(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_exact(type_size::BYTE)?[0] != 0)
    }

    fixed_width_reader!(read_u8 -> u8, type_size::UINT8, get_u8);
    fixed_width_reader!(read_i8 -> i8, type_size::INT8, get_i8);
    fixed_width_reader!(read_u16 -> u16, type_size::UINT16, get_u16_le);
    fixed_width_reader!(read_i16 -> i16, type_size::INT16, get_i16_le);
    fixed_width_reader!(read_u32 -> u32, type_size::UINT32, get_u32_le);
    fixed_width_reader!(read_i32 -> i32, type_size::INT32, get_i32_le);
    fixed_width_reader!(read_u64 -> u64, type_size::UINT64, get_u64_le);
    fixed_width_reader!(read_i64 -> i64, type_size::INT64, get_i64_le);
    fixed_width_reader!(
        /// IEEE-754 single precision, little-endian.
        read_f32 -> f32, type_size::FLOAT32, get_f32_le
    );
    fixed_width_reader!(
        /// IEEE-754 double precision, little-endian.
        read_f64 -> f64, type_size::FLOAT64, get_f64_le
    );

    /// Reads a 128-bit word as two little-endian 64-bit halves, low word first.
    #[inline]
    pub fn read_uint128(&mut self) -> Result<Uint128, DecodeError> {
        let mut raw = self.read_exact(type_size::UINT128)?;
        let lo = raw.get_u64_le();
        let hi = raw.get_u64_le();
        tracing::trace!(hi, lo, "read uint128");
        Ok(Uint128 { hi, lo })
    }

    #[inline]
    pub fn read_int128(&mut self) -> Result<Int128, DecodeError> {
        let Uint128 { hi, lo } = self.read_uint128()?;
        Ok(Int128 { hi, lo })
    }

    /// Reads the raw bits of a quadruple precision float.
    #[inline]
    pub fn read_float128(&mut self) -> Result<Float128, DecodeError> {
        let Uint128 { hi, lo } = self.read_uint128()?;
        Ok(Float128 { hi, lo })
    }

    varint_reader!(read_uvarint64 -> u64);
    varint_reader!(
        /// Decodes the 64-bit varint and truncates it to 32 bits.
        read_uvarint32 -> u32
    );
    varint_reader!(
        /// Decodes the 64-bit varint and truncates it to 16 bits.
        read_uvarint16 -> u16
    );
    varint_reader!(read_varint64 -> i64);
    varint_reader!(read_varint32 -> i32);
    varint_reader!(read_varint16 -> i16);

    /// Reads a varint length prefix.
    #[inline]
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        let value = self.read_uvarint64()?;
        usize::try_from(value).map_err(|_| DecodeError::LengthOverflow { value })
    }

    /// Reads a varint length prefix followed by that many raw bytes.
    ///
    /// The prefix and the payload are checked together, if the payload is
    /// short neither is consumed.
    pub fn read_byte_array(&mut self) -> Result<&'a [u8], DecodeError> {
        let (value, prefix_len) = u64::decode_leb128(self.rest())?;
        let len = usize::try_from(value).map_err(|_| DecodeError::LengthOverflow { value })?;

        let available = self.remaining() - prefix_len;
        if available < len {
            return Err(DecodeError::underrun(len, available));
        }
        self.pos += prefix_len;
        let out = self.read_exact(len)?;
        tracing::trace!(len, bytes = ?out, "read byte array");
        Ok(out)
    }

    /// Reads a length-prefixed UTF-8 string, failing on ill-formed sequences.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let data = self.read_byte_array()?;
        let value = core::str::from_utf8(data).map_err(|err| DecodeError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        })?;
        tracing::trace!(value, "read string");
        Ok(value.to_owned())
    }

    /// Reads a length-prefixed string, replacing every ill-formed UTF-8
    /// sequence with `U+FFFD`. Never fails with [`DecodeError::InvalidUtf8`].
    pub fn read_safe_string(&mut self) -> Result<String, DecodeError> {
        let data = self.read_byte_array()?;
        let value = String::from_utf8_lossy(data).into_owned();
        tracing::trace!(value = value.as_str(), "read safe UTF-8 string");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_little_endian() {
        let data = [
            0x01, // u8
            0xff, // i8
            0x34, 0x12, // u16
            0xfe, 0xff, // i16
            0x78, 0x56, 0x34, 0x12, // u32
            0x00, 0x00, 0x80, 0xbf, // f32 -1.0
        ];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_u8().unwrap(), 1);
        assert_eq!(decoder.read_i8().unwrap(), -1);
        assert_eq!(decoder.read_u16().unwrap(), 0x1234);
        assert_eq!(decoder.read_i16().unwrap(), -2);
        assert_eq!(decoder.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(decoder.read_f32().unwrap(), -1.0);
        assert!(!decoder.has_remaining());
        assert_eq!(decoder.position(), data.len());
    }

    #[test]
    fn test_u64_and_f64() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
        data.extend_from_slice(&(-42i64).to_le_bytes());
        data.extend_from_slice(&1.5f64.to_le_bytes());

        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(decoder.read_i64().unwrap(), -42);
        assert_eq!(decoder.read_f64().unwrap(), 1.5);
    }

    #[test]
    fn test_underrun_leaves_position() {
        let data = [0x01, 0x02, 0x03];
        let mut decoder = Decoder::new(&data);
        assert_eq!(
            decoder.read_u64(),
            Err(DecodeError::Underrun {
                needed: 8,
                available: 3
            })
        );
        assert_eq!(decoder.position(), 0);

        // The cursor is still usable for reads that fit.
        assert_eq!(decoder.read_u16().unwrap(), 0x0201);
        assert_eq!(
            decoder.read_u32(),
            Err(DecodeError::Underrun {
                needed: 4,
                available: 1
            })
        );
        assert_eq!(decoder.position(), 2);
    }

    #[test]
    fn test_bool_any_nonzero_is_true() {
        let mut decoder = Decoder::new(&[0x00, 0x01, 0x7f]);
        assert!(!decoder.read_bool().unwrap());
        assert!(decoder.read_bool().unwrap());
        assert!(decoder.read_bool().unwrap());
        assert!(decoder.read_bool().is_err());
    }

    #[test]
    fn test_uint128_low_word_first() {
        let mut data = Vec::new();
        data.extend_from_slice(&7u64.to_le_bytes());
        data.extend_from_slice(&9u64.to_le_bytes());
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_uint128().unwrap(), Uint128 { hi: 9, lo: 7 });

        let mut decoder = Decoder::new(&data[..15]);
        assert_eq!(
            decoder.read_uint128(),
            Err(DecodeError::Underrun {
                needed: 16,
                available: 15
            })
        );
    }

    #[test]
    fn test_varint_readers() {
        let data = [0x80, 0x01, 0x7f, 0xff, 0xff, 0xff, 0xff, 0x1f];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_uvarint64().unwrap(), 128);
        assert_eq!(decoder.read_varint32().unwrap(), -1);
        // 0x1_ffff_ffff narrowed to 32 bits.
        assert_eq!(decoder.read_uvarint32().unwrap(), u32::MAX);
        assert!(!decoder.has_remaining());
    }

    #[test]
    fn test_truncated_varint_is_malformed() {
        let mut decoder = Decoder::new(&[0x80, 0x80]);
        assert_eq!(decoder.read_uvarint64(), Err(DecodeError::MalformedVarint));
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn test_byte_array() {
        let data = [0x03, b'a', b'b', b'c', 0x00];
        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_byte_array().unwrap(), b"abc");
        assert_eq!(decoder.read_byte_array().unwrap(), b"");
        assert!(!decoder.has_remaining());
    }

    #[test]
    fn test_byte_array_underrun_consumes_nothing() {
        let data = [0x05, b'a', b'b'];
        let mut decoder = Decoder::new(&data);
        assert_eq!(
            decoder.read_byte_array(),
            Err(DecodeError::Underrun {
                needed: 5,
                available: 2
            })
        );
        assert_eq!(decoder.position(), 0);
    }

    #[test]
    fn test_string_strict_and_lenient() {
        let data = [0x04, b'o', 0xff, b'k', 0xc3];

        let mut decoder = Decoder::new(&data);
        assert_eq!(
            decoder.read_string(),
            Err(DecodeError::InvalidUtf8 { valid_up_to: 1 })
        );

        let mut decoder = Decoder::new(&data);
        assert_eq!(decoder.read_safe_string().unwrap(), "o\u{FFFD}k\u{FFFD}");
        assert!(!decoder.has_remaining());

        let mut decoder = Decoder::new(&[0x02, 0xc3, 0xa9]);
        assert_eq!(decoder.read_string().unwrap(), "é");
    }
}
