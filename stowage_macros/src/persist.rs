use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, LitInt, LitStr};

#[derive(Default)]
struct PersistAttrs {
    name: Option<LitStr>,
    version: Option<u64>,
    migrate: Option<syn::Path>,
}

pub fn derive_persist(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let attrs = parse_struct_attrs(input)?;

    // Default identity mirrors where the type lives: `crate::module::Type`
    let type_name = match &attrs.name {
        Some(lit) => quote! { #lit },
        None => quote! { concat!(module_path!(), "::", stringify!(#name)) },
    };

    let schema_version = match attrs.version {
        Some(version) => quote! { ::core::option::Option::Some(#version) },
        None => quote! { ::core::option::Option::None },
    };

    let migrate = match (attrs.version, &attrs.migrate) {
        (None, Some(path)) => {
            return Err(syn::Error::new_spanned(
                path,
                "`migrate` requires a schema `version`",
            ));
        }
        (_, Some(path)) => quote! {
            fn migrate(
                fields: stowage::Fields,
                recorded: ::core::option::Option<u64>,
            ) -> stowage::Fields {
                #path(fields, recorded)
            }
        },
        (_, None) => quote! {},
    };

    let versionable = match attrs.version {
        Some(_) => quote! {
            impl #impl_generics stowage::Versionable for #name #ty_generics #where_clause {}
        },
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics stowage::Persist for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;
            const SCHEMA_VERSION: ::core::option::Option<u64> = #schema_version;

            #migrate
        }

        #versionable
    })
}

fn parse_struct_attrs(input: &DeriveInput) -> syn::Result<PersistAttrs> {
    let mut attrs = PersistAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("persist") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("version") {
                let value: LitInt = meta.value()?.parse()?;
                attrs.version = Some(value.base10_parse::<u64>()?);
            } else if meta.path.is_ident("migrate") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.migrate = Some(value.parse()?);
            } else {
                return Err(meta.error("unsupported persist attribute"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}
