//! Procedural and derive macros supporting the `antelope-codec` crate.
//!
//! None of these macros are meant to be useful on their own; they all
//! generate code that refers back to traits and types defined in
//! `antelope-codec`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemEnum, ItemStruct, punctuated::Punctuated, MetaNameValue, Token, parse::Parser};

mod attr;
mod contract;
mod error;
mod serde;

/// Implement the `ABISerializable` trait for a struct or a simple enum.
///
/// For a struct, this calls `to_bin`/`from_bin` on every field, in
/// declaration order. For an enum, every variant must hold exactly one
/// field; the wire form is a `VarUint32` tag (the variant's declaration
/// index) followed by the variant's payload, matching how the Antelope
/// ABI encodes tagged variants.
#[proc_macro_derive(ABISerializable)]
pub fn derive_abiserializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    serde::derive(&input).into()
}

/// Implement `serde::Serialize`/`serde::Deserialize` for an enum the way
/// Antelope variant types expect: as a two-element `[tag, value]` array,
/// where `tag` is the `snake_case` name of the active variant.
#[proc_macro_derive(SerializeEnum, attributes(serde))]
pub fn derive_serialize_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    serde::derive_serialize_enum(&input, false).into()
}

/// Same as [`macro@SerializeEnum`], but the tag is prefixed with the
/// `snake_case` name of the enum itself (e.g. `action_trace_v0` instead
/// of just `v0`).
#[proc_macro_derive(SerializeEnumPrefixed, attributes(serde))]
pub fn derive_serialize_enum_prefixed(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    serde::derive_serialize_enum(&input, true).into()
}

/// Attribute macro to easily declare structs representing contract actions.
///
/// See [`Contract`](../antelope_codec/trait.Contract.html) for the trait this implements.
#[proc_macro_attribute]
pub fn contract(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let attrs = parser.parse(attrs).expect("invalid arguments to #[contract(...)]");
    let item = parse_macro_input!(item as ItemStruct);
    contract::add_contract_trait_impl(attrs, item).into()
}

/// Add a `location` field to all variants of a `Snafu` error enum.
///
/// This will add the `location` field to all variants, which need to be
/// either structs or the unit type (tuple variants are not allowed). The
/// location field will be automatically populated when using the error
/// selector.
///
/// This macro will also update the display string (if defined) to also
/// show the location that has been captured.
///
/// **NOTE:** adding the `location` field to an error enum will increase
/// its size by 32 bytes, and an additional 32 bytes for each variant that
/// contains a `source` field (as this latter also has the extra size),
/// recursively. This might become expensive quite quickly, that's why
/// the corresponding feature isn't enabled by default.
///
/// **NOTE:** you cannot use a `whatever` variant in conjunction with
/// this, nor can you manually define the `location` field yourself (it
/// will conflict with the generated one).
#[proc_macro_attribute]
pub fn with_location(_attrs: TokenStream, item: TokenStream) -> TokenStream {
    with_location_impl(item)
}

#[cfg(feature = "detailed-error")]
fn with_location_impl(item: TokenStream) -> TokenStream {
    let error_enum = parse_macro_input!(item as ItemEnum);
    error::add_location_to_error_enum(error_enum).into()
}

#[cfg(not(feature = "detailed-error"))]
fn with_location_impl(item: TokenStream) -> TokenStream {
    item
}
