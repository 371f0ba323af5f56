use crate::field_parser::{self, FieldDefs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub fn new(item_struct: &ItemStruct) -> Result<TokenStream, syn::Error> {
    if !item_struct.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item_struct.generics,
            "`#[derive(Entity)]` does not support generic structs, each entity needs its own table",
        ));
    }
    let fields = field_parser::get_named_fields(item_struct)?;
    let field_defs = field_parser::get_field_macros(&fields, item_struct)?;
    Ok(entity_impl(item_struct, &field_defs))
}

fn entity_impl(item_struct: &ItemStruct, field_defs: &FieldDefs) -> TokenStream {
    let struct_ident = &item_struct.ident;
    let table = struct_ident.to_string();
    let pk_name = &field_defs.pk.name;

    let column_arms = field_defs.columns.iter().map(|column| {
        let name = &column.name;
        let key = name.to_string();
        quote! { #key => ::core::option::Option::Some(::multitable::Value::from(::core::clone::Clone::clone(&self.#name))), }
    });
    let transient_keys: Vec<String> = field_defs.transients.iter().map(|transient| transient.name.to_string()).collect();
    let transient_arm = if transient_keys.is_empty() {
        quote! {}
    } else {
        quote! { #(#transient_keys)|* => ::core::option::Option::None, }
    };

    quote! {
        impl ::multitable::Entity for #struct_ident {
            const TABLE: &'static str = #table;

            fn id(&self) -> &::multitable::Identity {
                &self.#pk_name
            }

            fn id_mut(&mut self) -> &mut ::multitable::Identity {
                &mut self.#pk_name
            }

            fn value_of(&self, field: &str) -> ::core::option::Option<::multitable::Value> {
                match field {
                    #(#column_arms)*
                    #transient_arm
                    _ => ::core::option::Option::None,
                }
            }

            fn scope() -> ::core::result::Result<&'static ::multitable::TableScope, ::multitable::ScopeError> {
                ::multitable::entity_scope!(<Self as ::multitable::Entity>::TABLE)
            }
        }
    }
}
