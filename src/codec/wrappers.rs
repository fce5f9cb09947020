//! Indirection: `Option`, `Box`, `Rc` and `Arc`.
//!
//! A wrapper decodes as the type it wraps, allocating the container on the
//! way. Presence bytes belong to the outermost value: an optional `Option<T>`
//! that is absent becomes `None`, and one that is present becomes `Some` of
//! the inner shape without reading a second flag. Without the optional flag
//! an `Option<T>` always decodes to `Some`.

use std::rc::Rc;
use std::sync::Arc;

use super::Decode;
use crate::decoder::Decoder;
use crate::error::DecodeError;

impl<T: Decode> Decode for Option<T> {
    const SELF_DECODING: bool = T::SELF_DECODING;

    #[inline]
    fn decode_shape(
        decoder: &mut Decoder<'_>,
        explicit_length: Option<usize>,
    ) -> Result<Self, DecodeError> {
        T::decode_shape(decoder, explicit_length).map(Some)
    }

    #[inline]
    fn zero() -> Self {
        None
    }
}

macro_rules! pointer_wrapper {
    ($($wrapper:ident),+ $(,)?) => {$(
        impl<T: Decode> Decode for $wrapper<T> {
            const SELF_DECODING: bool = T::SELF_DECODING;

            #[inline]
            fn decode_shape(
                decoder: &mut Decoder<'_>,
                explicit_length: Option<usize>,
            ) -> Result<Self, DecodeError> {
                T::decode_shape(decoder, explicit_length).map($wrapper::new)
            }

            #[inline]
            fn zero() -> Self {
                $wrapper::new(T::zero())
            }
        }
    )+};
}

pointer_wrapper!(Box, Rc, Arc);
