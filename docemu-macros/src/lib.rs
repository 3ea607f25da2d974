//! Procedural macros for the docemu project.
//!
//! This crate provides `#[derive(Identifiable)]`, which gives a struct a compile-time
//! checked key accessor in place of runtime member lookup.
//!
//! Every named field of type `String` or `Option<String>` becomes addressable by its name,
//! matched case-insensitively (Unicode lowercase folding). Fields of other types are ignored.
//!
//! # Attributes
//!
//! - `#[identifiable(rename = "name")]` on a field addresses it by `name` instead.
//! - `#[identifiable(skip)]` on a field hides it.
//! - `#[identifiable(crate = "path")]` on the struct changes the path the generated impl
//!   refers to (default `::docemu`).
//!
//! # Example
//!
//! ```ignore
//! use docemu::prelude::*;
//!
//! #[derive(Clone, Identifiable)]
//! struct Order {
//!     #[identifiable(rename = "id")]
//!     order_number: String,
//!     customer: Option<String>,
//!     total: u64,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docemu_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Fields, GenericArgument, LitStr, Path, PathArguments, Type,
    parse_macro_input,
};

#[proc_macro_derive(Identifiable, attributes(identifiable))]
pub fn derive_identifiable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_identifiable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

enum StringField {
    Plain,
    Optional,
}

#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
}

fn expand_identifiable(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(DataStruct { fields: Fields::Named(named), .. }) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Identifiable can only be derived for structs with named fields",
            ));
        }
    };

    let krate = crate_path(&input.attrs)?;
    let mut arms = Vec::new();

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };

        let options = field_options(&field.attrs)?;

        if options.skip {
            continue;
        }

        let access = match string_field(&field.ty) {
            Some(StringField::Plain) => quote!(::core::option::Option::Some(self.#ident.as_str())),
            Some(StringField::Optional) => quote!(self.#ident.as_deref()),
            None => continue,
        };

        let name = options.rename.unwrap_or_else(|| {
            ident.to_string().trim_start_matches("r#").to_string()
        });

        arms.push(quote! {
            if #krate::identifier::names_match(name, #name) {
                return #access;
            }
        });
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::identifier::Identifiable for #ident #ty_generics #where_clause {
            fn property(&self, name: &str) -> ::core::option::Option<&str> {
                #(#arms)*
                let _ = name;
                ::core::option::Option::None
            }
        }
    })
}

fn crate_path(attrs: &[Attribute]) -> syn::Result<TokenStream2> {
    let mut path: Option<Path> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("identifiable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                path = Some(lit.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `crate = \"...\"`"))
            }
        })?;
    }

    Ok(match path {
        Some(path) => quote!(#path),
        None => quote!(::docemu),
    })
}

fn field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("identifiable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                options.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `skip`"))
            }
        })?;
    }

    Ok(options)
}

fn string_field(ty: &Type) -> Option<StringField> {
    let Type::Path(type_path) = ty else {
        return None;
    };

    let segment = type_path.path.segments.last()?;

    if segment.ident == "String" && segment.arguments.is_none() {
        return Some(StringField::Plain);
    }

    if segment.ident == "Option" {
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(GenericArgument::Type(inner)) = args.args.first() {
                if let Some(StringField::Plain) = string_field(inner) {
                    return Some(StringField::Optional);
                }
            }
        }
    }

    None
}
