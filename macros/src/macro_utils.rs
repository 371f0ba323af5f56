use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use syn::Type;

/// True when the last path segment of `ty` is `name`, e.g. `Identity` or `multitable::Identity`.
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    matches!(ty, Type::Path(tp) if tp.qself.is_none() && tp.path.segments.last().is_some_and(|seg| seg.ident == name))
}

pub fn write_to_local_file(lines: Vec<String>, dir_name: &str, file_name: &str) {
    let dir_path = match env::current_dir() {
        Ok(dir) => dir.join("target").join("macros").join(dir_name),
        Err(e) => {
            eprintln!("Current dir inaccessible: {}", e);
            return;
        }
    };
    if let Err(e) = std::fs::create_dir_all(&dir_path) {
        eprintln!("Failed to create directory {:?}: {}", dir_path, e);
        return;
    }
    let full_path = dir_path.join(file_name);

    #[cfg(not(test))]
    {
        if let Err(e) = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&full_path)
            .and_then(|mut file| file.write_all(lines.join("\n").as_bytes()))
        {
            eprintln!("Failed to write to {:?}: {}", full_path, e);
        }
    }
}

/// Writes the pretty printed expansion under `target/macros/<dir>/` and hands the stream back.
pub fn submit_struct_to_stream(stream: proc_macro2::TokenStream, dir: &str, struct_ident: &Ident, suffix: &str) -> TokenStream {
    let formatted_token_stream =
        match syn::parse2::<syn::File>(stream.clone()) {
            Ok(ast) => prettyplease::unparse(&ast),
            Err(_) => stream.to_string(),
        };

    write_to_local_file(vec![formatted_token_stream], dir, &format!("{}{}", struct_ident, suffix));

    quote! {
        #stream
    }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_identity_by_last_segment() {
        assert!(is_type_named(&syn::parse_quote!(Identity), "Identity"));
        assert!(is_type_named(&syn::parse_quote!(multitable::Identity), "Identity"));
        assert!(!is_type_named(&syn::parse_quote!(String), "Identity"));
        assert!(!is_type_named(&syn::parse_quote!([u8; 4]), "Identity"));
    }
}
