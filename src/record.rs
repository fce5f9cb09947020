//! Records: aggregates decoded field by field in declaration order.
//!
//! A record type describes its fields with a static table of
//! [`FieldDescriptor`]s and provides per-field decode glue through [`Record`].
//! `#[derive(Decode)]` generates both; a manual implementation looks like:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Packed {
//!     count: u8,
//!     items: Vec<u8>,
//! }
//!
//! impl Record for Packed {
//!     const FIELDS: &'static [FieldDescriptor] = &[
//!         FieldDescriptor::new("count", 0).size_of("items"),
//!         FieldDescriptor::new("items", 1),
//!     ];
//!
//!     fn decode_field(
//!         &mut self,
//!         ordinal: usize,
//!         decoder: &mut Decoder<'_>,
//!         option: DecodeOption,
//!     ) -> Result<(), DecodeError> {
//!         match ordinal {
//!             0 => self.count = decoder.decode_with_option(option)?,
//!             1 => self.items = decoder.decode_with_option(option)?,
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//!
//!     fn element_count(&self, ordinal: usize) -> usize {
//!         match ordinal {
//!             0 => self.count.element_count(),
//!             _ => 0,
//!         }
//!     }
//! }
//! ```

use std::rc::Rc;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::codec::DecodeOption;
use crate::decoder::Decoder;
use crate::error::{DecodeError, SchemaError};

/// Static metadata for one field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Position of the field in declaration order.
    pub ordinal: usize,
    /// The field is never read from the wire and keeps its default value.
    pub skip: bool,
    /// The field is preceded by a one-byte presence flag.
    pub optional: bool,
    /// The field is only decoded if bytes remain when it is reached. Such
    /// fields must all come after the regular fields.
    pub binary_extension: bool,
    /// This integer field holds the element count of the named later field,
    /// which then has no length prefix of its own.
    pub size_of: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, ordinal: usize) -> Self {
        FieldDescriptor {
            name,
            ordinal,
            skip: false,
            optional: false,
            binary_extension: false,
            size_of: None,
        }
    }

    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn binary_extension(mut self) -> Self {
        self.binary_extension = true;
        self
    }

    pub const fn size_of(mut self, target: &'static str) -> Self {
        self.size_of = Some(target);
        self
    }
}

/// A type decoded as a record.
pub trait Record: Default {
    /// One descriptor per field, in declaration order, `ordinal` matching the
    /// index in this slice.
    const FIELDS: &'static [FieldDescriptor];

    /// [`Record::FIELDS`], validated.
    ///
    /// Evaluated at compile time, once for each record type that gets
    /// decoded. A defective layout fails the build.
    const LAYOUT: RecordLayout = RecordLayout::new(Self::FIELDS);

    /// Decode the field at `ordinal` from `decoder`, using `option`.
    fn decode_field(
        &mut self,
        ordinal: usize,
        decoder: &mut Decoder<'_>,
        option: DecodeOption,
    ) -> Result<(), DecodeError>;

    /// The element count held by the size-source field at `ordinal`.
    ///
    /// Only called for fields whose descriptor has `size_of` set.
    fn element_count(&self, ordinal: usize) -> usize {
        let _ = ordinal;
        0
    }
}

/// An integer that can supply the element count of another field.
///
/// Counts that cannot be represented, negative values in particular, clamp
/// to zero rather than failing the decode.
pub trait SizeSource {
    fn element_count(&self) -> usize;
}

macro_rules! unsigned_size_source {
    ($($ty:ty),+ $(,)?) => {$(
        impl SizeSource for $ty {
            #[inline]
            fn element_count(&self) -> usize {
                // Counts past isize::MAX are treated like negative ones.
                usize::try_from(*self)
                    .ok()
                    .filter(|count| isize::try_from(*count).is_ok())
                    .unwrap_or(0)
            }
        }
    )+};
}

macro_rules! signed_size_source {
    ($($ty:ty),+ $(,)?) => {$(
        impl SizeSource for $ty {
            #[inline]
            fn element_count(&self) -> usize {
                usize::try_from(*self).unwrap_or(0)
            }
        }
    )+};
}

unsigned_size_source!(u8, u16, u32, u64, usize);
signed_size_source!(i8, i16, i32, i64, isize);

impl<T: SizeSource> SizeSource for Option<T> {
    #[inline]
    fn element_count(&self) -> usize {
        self.as_ref().map_or(0, SizeSource::element_count)
    }
}

macro_rules! pointer_size_source {
    ($($wrapper:ident),+ $(,)?) => {$(
        impl<T: SizeSource> SizeSource for $wrapper<T> {
            #[inline]
            fn element_count(&self) -> usize {
                T::element_count(self)
            }
        }
    )+};
}

pointer_size_source!(Box, Rc, Arc);

/// A validated field table.
#[derive(Debug, Clone, Copy)]
pub struct RecordLayout {
    fields: &'static [FieldDescriptor],
}

impl RecordLayout {
    /// Validate `fields`.
    ///
    /// * `binary_extension` fields must be contiguous at the end (skipped
    ///   fields may be interleaved, they never touch the wire).
    /// * A `size_of` link must name a field declared after the source, and
    ///   each field can have at most one size source.
    pub const fn try_new(fields: &'static [FieldDescriptor]) -> Result<Self, SchemaError> {
        let mut seen_extension = false;
        let mut index = 0;
        while index < fields.len() {
            let field = &fields[index];
            index += 1;
            if field.skip {
                continue;
            }
            if field.binary_extension {
                seen_extension = true;
            } else if seen_extension {
                return Err(SchemaError::ExtensionNotTrailing { field: field.name });
            }

            let Some(target) = field.size_of else {
                continue;
            };
            match position(fields, target) {
                None => {
                    return Err(SchemaError::UnknownSizeTarget {
                        field: field.name,
                        target,
                    })
                }
                // `index` is already one past this field.
                Some(target_index) if target_index < index => {
                    return Err(SchemaError::SizeTargetNotLater {
                        field: field.name,
                        target,
                    })
                }
                Some(_) => {}
            }

            let mut earlier = 0;
            while earlier + 1 < index {
                let other = &fields[earlier];
                earlier += 1;
                if let (false, Some(other_target)) = (other.skip, other.size_of) {
                    if str_eq(other_target, target) {
                        return Err(SchemaError::DuplicateSizeTarget { target });
                    }
                }
            }
        }
        Ok(RecordLayout { fields })
    }

    /// Validate `fields`, panicking on a defective layout.
    ///
    /// # Panics
    ///
    /// If [`RecordLayout::try_new`] fails. A bad layout is a bug in the type
    /// definition and no input can make it decode. In a const context, such as
    /// [`Record::LAYOUT`], the panic is a compile error.
    #[track_caller]
    pub const fn new(fields: &'static [FieldDescriptor]) -> Self {
        match Self::try_new(fields) {
            Ok(layout) => layout,
            Err(SchemaError::ExtensionNotTrailing { .. }) => panic!(
                "invalid record layout: `binary_extension` fields must be packed together \
                 at the end of the record"
            ),
            Err(SchemaError::UnknownSizeTarget { .. }) => {
                panic!("invalid record layout: `sizeof` names an unknown field")
            }
            Err(SchemaError::SizeTargetNotLater { .. }) => {
                panic!("invalid record layout: `sizeof` names a field that is not decoded after it")
            }
            Err(SchemaError::DuplicateSizeTarget { .. }) => {
                panic!("invalid record layout: a field has more than one size source")
            }
        }
    }

    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }
}

/// Index of the field called `name`.
const fn position(fields: &[FieldDescriptor], name: &str) -> Option<usize> {
    let mut index = 0;
    while index < fields.len() {
        if str_eq(fields[index].name, name) {
            return Some(index);
        }
        index += 1;
    }
    None
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Element counts produced by size-source fields, keyed by the name of the
/// field they size. Scoped to one record instance.
#[derive(Debug, Default)]
struct SizeTable {
    entries: SmallVec<[(&'static str, usize); 2]>,
}

impl SizeTable {
    fn record(&mut self, target: &'static str, count: usize) {
        match self.entries.iter_mut().find(|(name, _)| *name == target) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((target, count)),
        }
    }

    /// Remove and return the count recorded for `field`.
    fn take(&mut self, field: &str) -> Option<usize> {
        let index = self.entries.iter().position(|(name, _)| *name == field)?;
        Some(self.entries.swap_remove(index).1)
    }
}

/// Decode a record field by field.
///
/// For each field in declaration order:
/// * `skip` fields are left at their default.
/// * Once a `binary_extension` field is reached with no bytes left, it and
///   every later field keep their defaults and decoding stops successfully.
/// * Other fields decode with an option built from `optional` and, if a
///   size-source field already recorded a count for this field, that count as
///   the explicit sequence length.
/// * After a size-source field decodes, its value is recorded for its target.
///
/// Any field error aborts the record and is returned unchanged.
///
/// The layout is checked through [`Record::LAYOUT`], so a record with a
/// defective layout does not build.
pub fn decode_record<R: Record>(decoder: &mut Decoder<'_>) -> Result<R, DecodeError> {
    let layout = R::LAYOUT;
    let mut record = R::default();
    let mut sizes = SizeTable::default();

    for field in layout.fields() {
        if field.skip {
            continue;
        }

        if field.binary_extension && !decoder.has_remaining() {
            tracing::debug!(
                field = field.name,
                "no bytes left, leaving binary extension fields at default"
            );
            break;
        }

        let option = DecodeOption {
            optional: field.optional,
            explicit_length: sizes.take(field.name),
        };
        tracing::debug!(field = field.name, ?option, "struct field");
        record.decode_field(field.ordinal, decoder, option)?;

        if let Some(target) = field.size_of {
            let count = record.element_count(field.ordinal);
            tracing::debug!(field = field.name, size_of = target, count, "setting size of field");
            sizes.record(target, count);
        }
    }

    Ok(record)
}
