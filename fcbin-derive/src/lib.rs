//! Derive macro for fcbin.
//!
//! Provides `#[derive(Decode)]`, which turns a struct with named fields into an
//! fcbin record: its fields are decoded one after another, in declaration
//! order, with no framing around them.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::support::FieldMetadata;

mod support;


/// Derive macro for implementing `fcbin::Decode` on a record.
///
/// Note: You must also derive or implement `Default` for your struct, skipped
/// fields and absent extension fields keep their default value.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, fcbin::Decode)]
/// pub struct Transfer {
///     from: Name,
///     to: Name,
///     #[bin(sizeof = "memo")]
///     memo_len: u8,
///     memo: Vec<u8>,
///     #[bin(optional)]
///     fee: Option<u64>,
///     #[bin(skip)]
///     cached_hash: Option<[u8; 32]>,
///     #[bin(binary_extension)]
///     note: String,
/// }
/// ```
///
/// Field options, inside `#[bin(...)]`:
///
/// * `skip`: never read from the wire.
/// * `optional`: preceded by a one-byte presence flag.
/// * `binary_extension`: only read if bytes remain. Extension fields must come
///   after every regular field.
/// * `sizeof = "field"`: this integer is the element count of the named later
///   field, which is then read without a length prefix.
///
/// Field types of generic records need their own `fcbin::Decode` bounds.
#[proc_macro_derive(Decode, attributes(bin))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match impl_decode(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_decode(input: &DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            syn::Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    input,
                    "unit structs have no wire representation, use named fields",
                ))
            }
            syn::Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "only named fields supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "only structs supported")),
    };

    let fields = fields
        .iter()
        .enumerate()
        .map(|(ordinal, field)| support::parse_field_metadata(field, ordinal))
        .collect::<Result<Vec<_>>>()?;
    support::validate_layout(&fields)?;

    let descriptors = fields.iter().map(generate_descriptor);
    let decode_field_impl = generate_decode_field(&fields);
    let element_count_impl = generate_element_count(&fields);

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fcbin::record::Record for #name #ty_generics #where_clause {
            const FIELDS: &'static [::fcbin::record::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            #decode_field_impl
            #element_count_impl
        }

        impl #impl_generics ::fcbin::Decode for #name #ty_generics #where_clause {
            #[inline]
            fn decode_shape(
                decoder: &mut ::fcbin::Decoder<'_>,
                _explicit_length: ::core::option::Option<usize>,
            ) -> ::core::result::Result<Self, ::fcbin::DecodeError> {
                ::fcbin::record::decode_record::<Self>(decoder)
            }

            #[inline]
            fn zero() -> Self {
                <Self as ::core::default::Default>::default()
            }
        }
    })
}

/// Generates the `FieldDescriptor` constant for one field.
fn generate_descriptor(field: &FieldMetadata<'_>) -> TokenStream2 {
    let name = field.name.to_string();
    let ordinal = field.ordinal;

    let mut descriptor = quote! {
        ::fcbin::record::FieldDescriptor::new(#name, #ordinal)
    };
    if field.skip {
        descriptor = quote! { #descriptor.skip() };
    }
    if field.optional {
        descriptor = quote! { #descriptor.optional() };
    }
    if field.binary_extension {
        descriptor = quote! { #descriptor.binary_extension() };
    }
    if let Some(target) = &field.size_of {
        descriptor = quote! { #descriptor.size_of(#target) };
    }
    descriptor
}

fn generate_decode_field(fields: &[FieldMetadata<'_>]) -> TokenStream2 {
    let arms = fields.iter().filter(|field| !field.skip).map(|field| {
        let name = field.name;
        let ty = field.ty;
        let ordinal = field.ordinal;
        quote! {
            #ordinal => self.#name = decoder.decode_with_option::<#ty>(option)?,
        }
    });

    quote! {
        #[allow(unused_variables)]
        fn decode_field(
            &mut self,
            ordinal: usize,
            decoder: &mut ::fcbin::Decoder<'_>,
            option: ::fcbin::DecodeOption,
        ) -> ::core::result::Result<(), ::fcbin::DecodeError> {
            match ordinal {
                #(#arms)*
                _ => {}
            }
            ::core::result::Result::Ok(())
        }
    }
}

/// Generates `element_count` for records with size-source fields. Records
/// without any keep the provided default.
fn generate_element_count(fields: &[FieldMetadata<'_>]) -> TokenStream2 {
    let sources: Vec<_> = fields
        .iter()
        .filter(|field| field.size_of.is_some())
        .collect();
    if sources.is_empty() {
        return TokenStream2::new();
    }

    let arms = sources.iter().map(|field| {
        let name = field.name;
        let ordinal = field.ordinal;
        quote! {
            #ordinal => ::fcbin::record::SizeSource::element_count(&self.#name),
        }
    });

    quote! {
        fn element_count(&self, ordinal: usize) -> usize {
            match ordinal {
                #(#arms)*
                _ => 0,
            }
        }
    }
}
