extern crate proc_macro;
mod entity;
mod field_parser;
mod macro_utils;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;
use syn::{parse_macro_input, ItemStruct};

/// Implements `multitable::Entity` for a struct with named fields.
///
/// One field must be marked `#[pk]` and have type `Identity`. Fields marked `#[transient]` are not
/// queryable, every other field must convert into `multitable::Value`.
#[proc_macro_derive(Entity, attributes(pk, transient))]
#[proc_macro_error]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item_struct = parse_macro_input!(input as ItemStruct);
    let stream = match entity::new(&item_struct) {
        Ok(stream) => stream,
        Err(e) => return e.to_compile_error().into(),
    };
    macro_utils::submit_struct_to_stream(stream, "entity", &item_struct.ident, "_derive.rs")
}
