//! Decoder for the FC_BUFFER style binary format.
//!
//! Values are reconstructed from a compact, little-endian, length-prefixed
//! byte stream by walking the static shape of the target type. Records
//! (structs) are described by a table of [`record::FieldDescriptor`]s, usually
//! generated with `#[derive(Decode)]`, which carries the per-field metadata
//! (`skip`, `optional`, `binary_extension`, `sizeof`).
//!
//! ```ignore
//! #[derive(Debug, Default, fcbin::Decode)]
//! struct Transfer {
//!     #[bin(sizeof = "memo")]
//!     memo_len: u8,
//!     memo: Vec<u8>,
//!     #[bin(optional)]
//!     fee: Option<u64>,
//!     #[bin(binary_extension)]
//!     tag: u32,
//! }
//!
//! let transfer: Transfer = fcbin::from_slice(&bytes)?;
//! ```

#![deny(clippy::as_conversions)]

pub mod codec;
pub mod config;
pub mod decoder;
pub mod error;
pub mod leb128;
pub mod record;

pub use codec::{Decode, DecodeOption, UnmarshalBinary};
pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use error::{DecodeError, SchemaError};

#[cfg(feature = "derive")]
pub use fcbin_derive::Decode;

/// Decode a `T` from the front of `data` with the default [`DecoderConfig`].
///
/// Trailing bytes are left untouched, use a [`Decoder`] directly to inspect
/// how much of the input was consumed.
pub fn from_slice<T: Decode>(data: &[u8]) -> Result<T, DecodeError> {
    Decoder::new(data).decode()
}
