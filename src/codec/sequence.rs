//! Fixed-size arrays and variable-length sequences.

use super::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;

/// Variable-length sequence: a varint element count, or the count supplied
/// by a size-source field, followed by the elements in order.
impl<T: Decode> Decode for Vec<T> {
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError> {
        let len = match explicit_length {
            Some(len) => len,
            None => decoder.read_length()?,
        };
        tracing::debug!(
            len,
            explicit = explicit_length.is_some(),
            type_name = core::any::type_name::<Self>(),
            "reading sequence"
        );

        let mut items = Vec::with_capacity(initial_capacity::<T>(len, decoder.remaining()));
        for decoded in 1..=len {
            let start = decoder.position();
            items.push(decoder.decode::<T>()?);

            // Decoding is deterministic in the position, so once an element
            // consumes nothing every later one does too. Only the input can
            // bound the count then.
            if decoder.position() == start && len - decoded > decoder.remaining() {
                return Err(DecodeError::SequenceTooLong {
                    len,
                    remaining: decoder.remaining(),
                });
            }
        }
        Ok(items)
    }

    #[inline]
    fn zero() -> Self {
        Vec::new()
    }
}

/// Number of elements to reserve up front for a sequence of `len` elements.
///
/// `len` comes off the wire, so the reservation is capped at what the
/// remaining input could fill, measured in bytes of `T`.
fn initial_capacity<T>(len: usize, remaining: usize) -> usize {
    len.min(remaining / core::mem::size_of::<T>().max(1))
}

/// Fixed-size array: exactly `N` elements, no count prefix.
impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        _explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError> {
        tracing::debug!(len = N, "reading array");

        let mut failure = None;
        let items = core::array::from_fn(|_| {
            if failure.is_some() {
                return T::zero();
            }
            decoder.decode::<T>().unwrap_or_else(|err| {
                failure = Some(err);
                T::zero()
            })
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(items),
        }
    }

    #[inline]
    fn zero() -> Self {
        core::array::from_fn(|_| T::zero())
    }
}
