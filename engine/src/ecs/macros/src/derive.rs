use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// The marker traits that can be derived.
pub enum Marker {
    Component,
    Event,
}

pub fn marker(input: TokenStream, marker: Marker) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // `::sprig` resolves inside the crate too, through `extern crate self as sprig;` in lib.rs.
    let path = match marker {
        Marker::Component => quote! { ::sprig::ecs::Component },
        Marker::Event => quote! { ::sprig::ecs::Event },
    };

    TokenStream::from(quote! {
        impl #impl_generics #path for #name #type_generics #where_clause {}
    })
}
