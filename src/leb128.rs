//! LEB128 variable-length integer encoding/decoding.
//!
//! The canonical wire form is always the 64-bit one. Narrower integers are
//! views of the 64-bit read: a `u32` varint decodes the full `u64` and then
//! truncates, without an overflow check, which is how the format reuses its
//! 64-bit varints for 16 and 32-bit fields.

// Truncating `as` casts are the narrowing rule of the format.
#![allow(clippy::as_conversions)]

use crate::error::DecodeError;

/// Types that can be decoded from, and encoded to, a LEB128 integer.
pub trait LebCodec: Sized + Copy {
    /// Most bytes a canonical 64-bit varint can occupy.
    const MAX_LEB_BYTES: usize = 10;

    /// Decode a LEB128 integer from the front of `data`.
    ///
    /// Returns the decoded value and the number of bytes it occupied. Fails
    /// with [`DecodeError::MalformedVarint`] if `data` runs out before a byte
    /// with a clear continuation bit, or if the value overflows 64 bits.
    fn decode_leb128(data: &[u8]) -> Result<(Self, usize), DecodeError>;

    /// Encode `self` as a LEB128 integer into the provided buffer, returning
    /// the number of bytes written.
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize;

    /// The number of bytes required to encode this integer.
    fn encoded_leb128_len(self) -> usize;
}

impl LebCodec for u64 {
    #[inline]
    fn decode_leb128(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut value = 0u64;
        for (i, &b) in data.iter().take(Self::MAX_LEB_BYTES).enumerate() {
            // The tenth byte only has room for the top bit of a u64.
            if i == Self::MAX_LEB_BYTES - 1 && b > 1 {
                return Err(DecodeError::malformed_varint());
            }
            value |= u64::from(b & 0x7f) << (7 * i);
            if b < 0x80 {
                return Ok((value, i + 1));
            }
        }
        Err(DecodeError::malformed_varint())
    }

    #[inline]
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut len = 1;
        while value >= 0x80 {
            buf.put_u8((value as u8) | 0x80);
            value >>= 7;
            len += 1;
        }
        buf.put_u8(value as u8);
        len
    }

    /// LEB128 encodes 7 bits per byte, so the length is
    /// `ceil(significant_bits / 7)` with a minimum of 1 byte for zero.
    #[inline]
    fn encoded_leb128_len(self) -> usize {
        // Lookup table mapping leading_zeros (0-64) to LEB128 byte count.
        #[rustfmt::skip]
        const LZ_TO_LEN: [u8; 65] = [
            10,                                         // 0:     64 bits -> 10 bytes
            9, 9, 9, 9, 9, 9, 9,                        // 1-7:   63-57 bits -> 9 bytes
            8, 8, 8, 8, 8, 8, 8,                        // 8-14:  56-50 bits -> 8 bytes
            7, 7, 7, 7, 7, 7, 7,                        // 15-21: 49-43 bits -> 7 bytes
            6, 6, 6, 6, 6, 6, 6,                        // 22-28: 42-36 bits -> 6 bytes
            5, 5, 5, 5, 5, 5, 5,                        // 29-35: 35-29 bits -> 5 bytes
            4, 4, 4, 4, 4, 4, 4,                        // 36-42: 28-22 bits -> 4 bytes
            3, 3, 3, 3, 3, 3, 3,                        // 43-49: 21-15 bits -> 3 bytes
            2, 2, 2, 2, 2, 2, 2,                        // 50-56: 14-8 bits  -> 2 bytes
            1, 1, 1, 1, 1, 1, 1, 1,                     // 57-64: 7-0 bits   -> 1 byte
        ];

        LZ_TO_LEN[self.leading_zeros() as usize] as usize
    }
}

impl LebCodec for i64 {
    #[inline]
    fn decode_leb128(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut value = 0i64;
        let mut shift = 0u32;
        for (i, &b) in data.iter().take(Self::MAX_LEB_BYTES).enumerate() {
            // The tenth byte holds bit 63 and the sign extension above it,
            // which must agree: only 0x00 and 0x7f are in range.
            if i == Self::MAX_LEB_BYTES - 1 && b != 0x00 && b != 0x7f {
                return Err(DecodeError::malformed_varint());
            }
            value |= i64::from(b & 0x7f) << shift;
            shift += 7;
            if b < 0x80 {
                // Sign-extend from the final byte's sign bit.
                if shift < 64 && (b & 0x40) != 0 {
                    value |= -1i64 << shift;
                }
                return Ok((value, i + 1));
            }
        }
        Err(DecodeError::malformed_varint())
    }

    #[inline]
    fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut len = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            // Arithmetic shift, keeps the sign.
            value >>= 7;
            len += 1;
            let sign_bit = byte & 0x40 != 0;
            if (value == 0 && !sign_bit) || (value == -1 && sign_bit) {
                buf.put_u8(byte);
                return len;
            }
            buf.put_u8(byte | 0x80);
        }
    }

    #[inline]
    fn encoded_leb128_len(self) -> usize {
        // A value needs enough 7-bit groups to hold its magnitude plus a sign bit.
        let significant = if self < 0 {
            64 - self.leading_ones()
        } else {
            64 - self.leading_zeros()
        };
        (significant as usize + 1).div_ceil(7).max(1)
    }
}

/// Narrowing views over the canonical 64-bit form.
macro_rules! narrowed_leb_codec {
    ($($ty:ty => $wide:ty),+ $(,)?) => {$(
        impl LebCodec for $ty {
            #[inline]
            fn decode_leb128(data: &[u8]) -> Result<(Self, usize), DecodeError> {
                let (value, len) = <$wide>::decode_leb128(data)?;
                Ok((value as $ty, len))
            }

            #[inline]
            fn encode_leb128<B: bytes::BufMut>(self, buf: &mut B) -> usize {
                <$wide>::from(self).encode_leb128(buf)
            }

            #[inline]
            fn encoded_leb128_len(self) -> usize {
                <$wide>::from(self).encoded_leb128_len()
            }
        }
    )+};
}

narrowed_leb_codec! {
    u32 => u64,
    u16 => u64,
    i32 => i64,
    i16 => i64,
}
