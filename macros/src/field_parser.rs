use crate::macro_utils;
use proc_macro2::Ident;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::token::Comma;
use syn::{Fields, ItemStruct, Type};

pub enum ParsingResult {
    Pk(FieldDef),
    Column(FieldDef),
    Transient(FieldDef),
}

#[derive(Clone)]
pub struct FieldDef {
    pub name: Ident,
    pub tpe: Type,
}

pub struct FieldDefs {
    pub pk: FieldDef,
    pub columns: Vec<FieldDef>,
    pub transients: Vec<FieldDef>,
}

pub fn get_named_fields(ast: &ItemStruct) -> Result<Punctuated<syn::Field, Comma>, syn::Error> {
    match &ast.fields {
        Fields::Named(columns_named) => Ok(columns_named.named.clone()),
        _ => Err(syn::Error::new(ast.span(), "`#[derive(Entity)]` only supports structs with named fields.")),
    }
}

fn parse_entity_field(field: &syn::Field) -> Result<ParsingResult, syn::Error> {
    let name = field.ident.clone().ok_or_else(|| syn::Error::new(field.span(), "Unnamed fields not supported"))?;
    let def = FieldDef { name, tpe: field.ty.clone() };
    for attr in &field.attrs {
        if attr.path().is_ident("pk") {
            if !macro_utils::is_type_named(&def.tpe, "Identity") {
                return Err(syn::Error::new(field.ty.span(), "`#[pk]` field must be of type `Identity`"));
            }
            return Ok(ParsingResult::Pk(def));
        } else if attr.path().is_ident("transient") {
            return Ok(ParsingResult::Transient(def));
        }
    }
    Ok(ParsingResult::Column(def))
}

pub fn get_field_macros(fields: &Punctuated<syn::Field, Comma>, ast: &ItemStruct) -> Result<FieldDefs, syn::Error> {
    let mut pk_column: Option<FieldDef> = None;
    let mut columns: Vec<FieldDef> = Vec::new();
    let mut transients: Vec<FieldDef> = Vec::new();

    for field in fields.iter() {
        match parse_entity_field(field)? {
            ParsingResult::Column(column) => columns.push(column),
            ParsingResult::Pk(pk) => {
                if pk_column.is_some() {
                    return Err(syn::Error::new(field.span(), "Multiple `#[pk]` fields found; only one is allowed"));
                }
                pk_column = Some(pk);
            }
            ParsingResult::Transient(transient) => transients.push(transient),
        }
    }

    let pk = pk_column.ok_or_else(|| syn::Error::new(ast.span(), "`#[pk]` attribute not found on any field. Exactly one field must have `#[pk]`."))?;

    Ok(FieldDefs { pk, columns, transients })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(item: ItemStruct) -> Result<FieldDefs, syn::Error> {
        let fields = get_named_fields(&item)?;
        get_field_macros(&fields, &item)
    }

    #[test]
    fn splits_pk_columns_and_transients() {
        let defs = parse(syn::parse_quote! {
            struct Student {
                #[pk]
                id: Identity,
                full_name: String,
                #[serde(default)]
                gpa: f64,
                #[transient]
                notes: Vec<String>,
            }
        }).unwrap();
        assert_eq!(defs.pk.name, "id");
        let columns: Vec<String> = defs.columns.iter().map(|c| c.name.to_string()).collect();
        assert_eq!(columns, vec!["full_name", "gpa"]);
        assert_eq!(defs.transients.len(), 1);
    }

    #[test]
    fn requires_exactly_one_identity_pk() {
        assert!(parse(syn::parse_quote! { struct A { id: Identity } }).is_err());
        assert!(parse(syn::parse_quote! { struct A { #[pk] id: Identity, #[pk] other: Identity } }).is_err());
        assert!(parse(syn::parse_quote! { struct A { #[pk] id: String } }).is_err());
        assert!(parse(syn::parse_quote! { struct A(Identity); }).is_err());
    }
}
