//! Error types for decoding.

/// Structural defect found while decoding a byte stream.
///
/// Every error is terminal for the in-flight decode, nothing in the crate
/// retries or recovers. Values that were partially populated before the error
/// should be discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Not enough bytes left for a fixed-width read or a length-prefixed blob.
    #[error("buffer underrun: required {needed} bytes, remaining {available}")]
    Underrun { needed: usize, available: usize },
    /// The buffer ended, or ten bytes went by, before a terminating varint byte.
    #[error("malformed varint")]
    MalformedVarint,
    /// A strict string read found bytes that are not UTF-8.
    #[error("invalid UTF-8 in string, valid up to byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
    /// The target type has no rule to decode it.
    #[error("decode: unsupported type '{type_name}'")]
    UnsupportedShape { type_name: &'static str },
    /// A length prefix does not fit in the platform's address space.
    #[error("length prefix {value} exceeds platform addressable memory")]
    LengthOverflow { value: u64 },
    /// A sequence of elements that occupy no bytes claims more elements than
    /// there are bytes left, so the count is not backed by the input.
    #[error("sequence of {len} zero-width elements exceeds the {remaining} remaining bytes")]
    SequenceTooLong { len: usize, remaining: usize },
    /// Nested values went deeper than [`crate::DecoderConfig::max_depth`].
    #[error("recursion limit of {limit} nested values exceeded")]
    RecursionLimitExceeded { limit: u32 },
    /// A self-decoding type rejected its own payload.
    #[error("invalid '{type_name}': {reason}")]
    InvalidData {
        type_name: &'static str,
        reason: &'static str,
    },
}

impl DecodeError {
    #[cold]
    #[inline(never)]
    pub(crate) fn underrun(needed: usize, available: usize) -> Self {
        DecodeError::Underrun { needed, available }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn malformed_varint() -> Self {
        DecodeError::MalformedVarint
    }
}

/// Defect in a record's field layout.
///
/// These describe a mistake in a type definition, not in the input data, so
/// they are fatal. [`Record::LAYOUT`](crate::Record::LAYOUT) turns them into
/// const evaluation errors and `#[derive(Decode)]` reports them with spans.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A regular field follows a `binary_extension` field.
    #[error(
        "`binary_extension` fields must be packed together at the end of the record, \
         problematic field '{field}'"
    )]
    ExtensionNotTrailing { field: &'static str },
    /// A `sizeof` link names a field that does not exist.
    #[error("field '{field}' is the size of unknown field '{target}'")]
    UnknownSizeTarget {
        field: &'static str,
        target: &'static str,
    },
    /// A `sizeof` link names a field that is decoded before, or is, the source.
    #[error("field '{field}' is the size of '{target}', which is not decoded after it")]
    SizeTargetNotLater {
        field: &'static str,
        target: &'static str,
    },
    /// Two fields claim to supply the size of the same field.
    #[error("field '{target}' has more than one size source")]
    DuplicateSizeTarget { target: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underrun_message_reports_counts() {
        let err = DecodeError::underrun(8, 3);
        assert_eq!(err, DecodeError::Underrun { needed: 8, available: 3 });
        assert_eq!(
            err.to_string(),
            "buffer underrun: required 8 bytes, remaining 3"
        );
    }

    #[test]
    fn test_schema_error_names_field() {
        let err = SchemaError::ExtensionNotTrailing { field: "fee" };
        assert!(err.to_string().contains("'fee'"));
    }
}
