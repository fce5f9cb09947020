//! Types and functions related to parsing the input from our proc-macro.

use darling::FromMeta;
use syn::{Field, Ident, Result, Type};

/// Metadata for a single field of a record.
pub struct FieldMetadata<'a> {
    /// Name of the field.
    pub name: &'a Ident,
    /// Type of the field.
    pub ty: &'a Type,
    /// Declaration position of the field.
    pub ordinal: usize,
    /// Never read from the wire, keeps its `Default` value.
    pub skip: bool,
    /// Preceded by a one-byte presence flag.
    pub optional: bool,
    /// Only decoded if bytes remain once it is reached.
    pub binary_extension: bool,
    /// Name of the later field this field holds the element count of.
    pub size_of: Option<String>,
}

/// Raw attributes parsed from `#[bin(...)]` on a field.
///
/// We parse these and then validate them with [`parse_field_metadata`].
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct RawBinFieldAttrs {
    skip: bool,
    optional: bool,
    binary_extension: bool,
    #[darling(rename = "sizeof")]
    size_of: Option<String>,
}

/// Parse `#[bin(...)]` attributes from a [`Field`] and returns a complete
/// [`FieldMetadata`].
pub fn parse_field_metadata(field: &Field, ordinal: usize) -> Result<FieldMetadata<'_>> {
    let raw = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("bin"))
        .map(|attr| RawBinFieldAttrs::from_meta(&attr.meta))
        .transpose()
        .map_err(|e| syn::Error::new_spanned(field, e.to_string()))?
        .unwrap_or_default();

    if raw.skip && (raw.optional || raw.binary_extension || raw.size_of.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "conflicting field attributes, 'skip' cannot be combined with other options",
        ));
    }
    if raw.size_of.as_deref() == Some("") {
        return Err(syn::Error::new_spanned(
            field,
            "'sizeof' requires the name of a field",
        ));
    }

    let name = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "only named fields supported"))?;

    Ok(FieldMetadata {
        name,
        ty: &field.ty,
        ordinal,
        skip: raw.skip,
        optional: raw.optional,
        binary_extension: raw.binary_extension,
        size_of: raw.size_of,
    })
}

/// Checks the field layout of a record as a whole.
///
/// Runs the checks of `fcbin::record::RecordLayout` at compile time, and also
/// rejects a size link to a skipped field, which would never be read.
pub fn validate_layout(fields: &[FieldMetadata<'_>]) -> Result<()> {
    let mut seen_extension = false;
    for (index, field) in fields.iter().enumerate() {
        if field.skip {
            continue;
        }
        if field.binary_extension {
            seen_extension = true;
        } else if seen_extension {
            return Err(syn::Error::new_spanned(
                field.name,
                format!(
                    "`binary_extension` fields must be packed together at the end of the record, \
                     problematic field '{}'",
                    field.name
                ),
            ));
        }

        let Some(target) = field.size_of.as_deref() else {
            continue;
        };
        let Some(target_index) = fields.iter().position(|other| other.name == target) else {
            return Err(syn::Error::new_spanned(
                field.name,
                format!("field '{}' is the size of unknown field '{target}'", field.name),
            ));
        };
        if target_index <= index {
            return Err(syn::Error::new_spanned(
                field.name,
                format!(
                    "field '{}' is the size of '{target}', which is not decoded after it",
                    field.name
                ),
            ));
        }
        if fields[target_index].skip {
            return Err(syn::Error::new_spanned(
                field.name,
                format!("field '{}' is the size of skipped field '{target}'", field.name),
            ));
        }
        let duplicate = fields[..index]
            .iter()
            .any(|other| other.size_of.as_deref() == Some(target));
        if duplicate {
            return Err(syn::Error::new_spanned(
                field.name,
                format!("field '{target}' has more than one size source"),
            ));
        }
    }
    Ok(())
}
