//! Derive macros for rprefs preference library
//!
//! This crate provides `#[derive(PreferenceEnum)]` for enums whose variants
//! are stored by name.
//!
//! # Usage
//!
//! ```text
//! use rprefs::DerivePreferenceEnum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, DerivePreferenceEnum)]
//! enum Theme {
//!     Light,
//!     #[preference(name = "night")]
//!     Dark,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta};

/// Derive macro for generating `PreferenceEnum` implementations.
///
/// Only enums made of unit variants are accepted.
///
/// # Attributes
///
/// ## Variant attributes (`#[preference(...)]`)
/// - `name = "stored"` - Name written to the store (defaults to the variant identifier)
#[proc_macro_derive(PreferenceEnum, attributes(preference))]
pub fn derive_preference_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "PreferenceEnum can only be derived for enums.\n\nTry: #[derive(PreferenceEnum)] on an enum with unit variants.",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "PreferenceEnum cannot be derived for generic enums",
        ));
    }

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "PreferenceEnum needs at least one variant to fall back on",
        ));
    }

    let mut idents = Vec::new();
    let mut names: Vec<String> = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "PreferenceEnum variants cannot carry data.\n\nExample:\n  #[derive(PreferenceEnum)]\n  enum Theme {\n      Light,\n      Dark,\n  }",
            ));
        }

        let stored =
            parse_variant_name(&variant.attrs)?.unwrap_or_else(|| variant.ident.to_string());
        if names.contains(&stored) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate stored name \"{stored}\""),
            ));
        }

        idents.push(&variant.ident);
        names.push(stored);
    }

    let arms = idents
        .iter()
        .zip(&names)
        .map(|(ident, stored)| quote! { #name::#ident => #stored });
    let paths = idents.iter().map(|ident| quote! { #name::#ident });

    Ok(quote! {
        impl ::rprefs::PreferenceEnum for #name {
            fn name(&self) -> &'static str {
                match self {
                    #( #arms, )*
                }
            }

            fn variants() -> &'static [Self] {
                const VARIANTS: &[#name] = &[#( #paths ),*];
                VARIANTS
            }
        }
    })
}

fn parse_variant_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut result = None;

    for attr in attrs {
        if !attr.path().is_ident("preference") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    if let Expr::Lit(lit) = &nv.value {
                        if let Lit::Str(s) = &lit.lit {
                            result = Some(s.value());
                            continue;
                        }
                    }
                    return Err(syn::Error::new_spanned(
                        &nv.value,
                        "expected a string literal, e.g. name = \"dark\"",
                    ));
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown preference attribute, expected `name = \"...\"`",
                    ));
                }
            }
        }
    }

    Ok(result)
}
