//! 128-bit words.
//!
//! On the wire a 128-bit value is two little-endian 64-bit halves with the
//! low word first.

use super::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Unsigned 128-bit integer as its two 64-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uint128 {
    pub hi: u64,
    pub lo: u64,
}

/// Signed 128-bit integer as its two 64-bit halves (two's complement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Int128 {
    pub hi: u64,
    pub lo: u64,
}

/// Raw bits of an IEEE-754 quadruple precision float.
///
/// Rust has no stable `f128`, so the halves are exposed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Float128 {
    pub hi: u64,
    pub lo: u64,
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        (u128::from(value.hi) << 64) | u128::from(value.lo)
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        let [lo, hi] = split(value.to_le_bytes());
        Uint128 { hi, lo }
    }
}

impl From<Int128> for i128 {
    fn from(value: Int128) -> Self {
        i128::from_le_bytes(join(value.lo, value.hi))
    }
}

impl From<i128> for Int128 {
    fn from(value: i128) -> Self {
        let [lo, hi] = split(value.to_le_bytes());
        Int128 { hi, lo }
    }
}

impl Float128 {
    /// The 16 bytes as they appear on the wire.
    pub fn to_le_bytes(self) -> [u8; 16] {
        join(self.lo, self.hi)
    }
}

impl core::fmt::Display for Uint128 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", u128::from(*self))
    }
}

impl core::fmt::Display for Int128 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", i128::from(*self))
    }
}

fn split(bytes: [u8; 16]) -> [u64; 2] {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&bytes[..8]);
    hi.copy_from_slice(&bytes[8..]);
    [u64::from_le_bytes(lo), u64::from_le_bytes(hi)]
}

fn join(lo: u64, hi: u64) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&lo.to_le_bytes());
    bytes[8..].copy_from_slice(&hi.to_le_bytes());
    bytes
}

macro_rules! wide_scalar {
    ($($ty:ty => $read:ident),+ $(,)?) => {$(
        impl Decode for $ty {
            #[inline]
            fn decode_shape(
                decoder: &mut Decoder<'_>,
                _explicit_length: Option<usize>,
            ) -> Result<Self, DecodeError> {
                decoder.$read().map(Into::into)
            }

            #[inline]
            fn zero() -> Self {
                <$ty>::default()
            }
        }
    )+};
}

wide_scalar! {
    Uint128 => read_uint128,
    Int128 => read_int128,
    Float128 => read_float128,
    u128 => read_uint128,
    i128 => read_int128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_slice;

    #[test]
    fn test_native_conversions() {
        let value = 0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10u128;
        let words = Uint128::from(value);
        assert_eq!(words.hi, 0x0102_0304_0506_0708);
        assert_eq!(words.lo, 0x090a_0b0c_0d0e_0f10);
        assert_eq!(u128::from(words), value);

        let words = Int128::from(-1i128);
        assert_eq!(words, Int128 { hi: u64::MAX, lo: u64::MAX });
        assert_eq!(i128::from(words), -1);
        assert_eq!(words.to_string(), "-1");
    }

    #[test]
    fn test_decode_wide() {
        let value = 0xdead_beef_0000_0001_0000_0000_cafe_babeu128;
        let data = value.to_le_bytes();
        assert_eq!(from_slice::<u128>(&data).unwrap(), value);
        assert_eq!(from_slice::<Uint128>(&data).unwrap(), Uint128::from(value));
        assert_eq!(from_slice::<i128>(&(-5i128).to_le_bytes()).unwrap(), -5);
        assert_eq!(from_slice::<Float128>(&data).unwrap().to_le_bytes(), data);
    }
}
