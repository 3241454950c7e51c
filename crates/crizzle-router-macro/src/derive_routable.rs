use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident, LitStr};

use crate::utils::{static_path_problem, to_snake_case, to_title_case};

/* -------------------------------------------------------------------------------------------------
 * `#[route(path = "...", name = "...", title = "...")]` / `#[fallback]`
 * -----------------------------------------------------------------------------------------------*/
#[derive(std::fmt::Debug, FromVariant)]
#[darling(attributes(route), forward_attrs(fallback))]
struct RouteVariant {
    ident: Ident,
    attrs: Vec<syn::Attribute>,

    // Arguments
    path: Option<LitStr>,
    name: Option<LitStr>,
    title: Option<LitStr>,
}

/* -------------------------------------------------------------------------------------------------
 * `#[derive(Routable)] -> #[routes(...)]`
 * -----------------------------------------------------------------------------------------------*/
#[derive(FromDeriveInput, std::fmt::Debug)]
#[darling(attributes(routes), supports(enum_unit))]
struct RoutableConfiguration {
    ident: Ident,
    data: darling::ast::Data<RouteVariant, ()>,

    /// Path of the runtime crate, for re-exports.
    #[darling(rename = "crate", default)]
    krate: Option<syn::Path>,
}

/// A variant after defaults are applied.
#[derive(std::fmt::Debug)]
pub(crate) struct ParsedRoute {
    pub(crate) ident: Ident,
    pub(crate) path: Option<String>,
    pub(crate) name: String,
    pub(crate) title: String,
    pub(crate) fallback: bool,
    pub(crate) span: Span,
}

impl ParsedRoute {
    fn from_variant(variant: RouteVariant) -> Self {
        let fallback = variant.attrs.iter().any(|a| a.path().is_ident("fallback"));
        let span = variant.ident.span();
        let ident_str = variant.ident.to_string();

        Self {
            path: variant.path.map(|p| p.value()),
            name: variant
                .name
                .map(|n| n.value())
                .unwrap_or_else(|| to_snake_case(&ident_str)),
            title: variant
                .title
                .map(|t| t.value())
                .unwrap_or_else(|| to_title_case(&ident_str)),
            ident: variant.ident,
            fallback,
            span,
        }
    }
}

/// Table invariants checked at compile time: one path per routed variant,
/// unique static paths, unique names, at most one fallback.
pub(crate) fn validate(routes: &[ParsedRoute]) -> syn::Result<()> {
    let mut fallback_seen = false;

    for (index, route) in routes.iter().enumerate() {
        let earlier = &routes[..index];

        match (&route.path, route.fallback) {
            (Some(_), true) => {
                return Err(syn::Error::new(
                    route.span,
                    "A `#[fallback]` variant is never matched by path; remove `path`.",
                ));
            }
            (None, false) => {
                return Err(syn::Error::new(
                    route.span,
                    format!("Variant `{}` needs `#[route(path = \"/...\")]` or `#[fallback]`.", route.ident),
                ));
            }
            (Some(path), false) => {
                if let Some(problem) = static_path_problem(path) {
                    return Err(syn::Error::new(route.span, format!("`{}`: {}.", path, problem)));
                }
                if let Some(other) = earlier.iter().find(|r| r.path.as_deref() == Some(path)) {
                    return Err(syn::Error::new(
                        route.span,
                        format!("Path `{}` is already used by `{}`.", path, other.ident),
                    ));
                }
            }
            (None, true) => {
                if fallback_seen {
                    return Err(syn::Error::new(
                        route.span,
                        "More than one variant is marked with `#[fallback]`. At most one is allowed.",
                    ));
                }
                fallback_seen = true;
            }
        }

        if let Some(other) = earlier.iter().find(|r| r.name == route.name) {
            return Err(syn::Error::new(
                route.span,
                format!("Route name `{}` is already used by `{}`.", route.name, other.ident),
            ));
        }
    }

    Ok(())
}

/* -------------------------------------------------------------------------------------------------
 * `#[derive(Routable)]` implementation
 * -----------------------------------------------------------------------------------------------*/
pub fn derive_routable_impl(input: TokenStream) -> TokenStream {
    let input_ast = parse_macro_input!(input as DeriveInput);
    let config = match RoutableConfiguration::from_derive_input(&input_ast) {
        Ok(config) => config,
        Err(err) => return err.write_errors().into(),
    };

    let variants = match config.data {
        darling::ast::Data::Enum(variants) => variants,
        darling::ast::Data::Struct(_) => {
            return syn::Error::new(
                config.ident.span(),
                "`#[derive(Routable)]` can only be used on enums.",
            )
            .to_compile_error()
            .into();
        }
    };

    let routes = variants
        .into_iter()
        .map(ParsedRoute::from_variant)
        .collect::<Vec<_>>();
    if let Err(err) = validate(&routes) {
        return err.to_compile_error().into();
    }

    let krate = config
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::crizzle_router));
    generate(&config.ident, &routes, &krate).into()
}

fn generate(enum_ident: &Ident, routes: &[ParsedRoute], krate: &syn::Path) -> TokenStream2 {
    let idents: Vec<&Ident> = routes.iter().map(|r| &r.ident).collect();
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    let titles: Vec<&str> = routes.iter().map(|r| r.title.as_str()).collect();
    let paths: Vec<&str> = routes
        .iter()
        .map(|r| r.path.as_deref().unwrap_or("*"))
        .collect();

    let routed_idents: Vec<&Ident> = routes.iter().filter(|r| !r.fallback).map(|r| &r.ident).collect();
    let routed_paths: Vec<&str> = routes.iter().filter_map(|r| r.path.as_deref()).collect();

    let fallback = match routes.iter().find(|r| r.fallback) {
        Some(route) => {
            let ident = &route.ident;
            quote! { ::core::option::Option::Some(Self::#ident) }
        }
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        /* -----------------------------------------------------------------------------------------
         * `Routable` implementation
         * ---------------------------------------------------------------------------------------*/
        impl #krate::Routable for #enum_ident {
            const ALL: &'static [Self] = &[#(Self::#idents),*];

            fn path(&self) -> &'static str {
                match self {
                    #(Self::#idents => #paths,)*
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn title(&self) -> &'static str {
                match self {
                    #(Self::#idents => #titles,)*
                }
            }

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#names => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn fallback() -> ::core::option::Option<Self> {
                #fallback
            }
        }

        /* -----------------------------------------------------------------------------------------
         * Path <-> variant conversions
         * ---------------------------------------------------------------------------------------*/
        // Writes the route's path, so the fallback displays as the catch-all.
        impl ::std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(#krate::Routable::path(self))
            }
        }

        impl ::std::str::FromStr for #enum_ident {
            type Err = #krate::RouteError;

            fn from_str(input: &str) -> ::core::result::Result<Self, Self::Err> {
                match #krate::normalize_path(input) {
                    #(#routed_paths => ::core::result::Result::Ok(Self::#routed_idents),)*
                    _ => ::core::result::Result::Err(#krate::RouteError::NotFound {
                        path: ::std::string::ToString::to_string(input),
                    }),
                }
            }
        }

        impl ::core::convert::From<#enum_ident> for #krate::Target {
            fn from(route: #enum_ident) -> Self {
                #krate::Target::name(#krate::Routable::name(&route))
            }
        }
    }
}
