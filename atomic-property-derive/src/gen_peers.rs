use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{Expr, Ident, Type};

use crate::config::Configuration;
use crate::gen_accessors::{constructor, storage_ident};
use crate::inspect::AnnotatedDeclaration;

/// The hidden backing field emitted beside an annotated property.
pub struct Peer {
    /// The property this field stores.
    pub property: Ident,
    pub value_ty: Type,
    pub ident: Ident,
    pub ty: TokenStream,
    /// Lock construction, present only when the property had an initializer.
    pub construction: Option<TokenStream>,
}

impl ToTokens for Peer {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = &self.ident;
        let ty = &self.ty;
        tokens.extend(quote!(#ident: #ty));
    }
}

/// The initializer as it is spliced into generated code.
///
/// A struct literal has to be parenthesized in the declaration; the parens
/// are dropped here so the expansion does not trip `unused_parens`.
fn inlined(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) if matches!(*paren.expr, Expr::Struct(_)) => &paren.expr,
        other => other,
    }
}

pub fn synthesize_peers(decl: &AnnotatedDeclaration, config: &Configuration) -> Vec<Peer> {
    let value_ty = &decl.ty;
    let ctor = constructor(config);

    let construction = decl.initializer.as_ref().map(|initializer| {
        let expr = inlined(&initializer.expr);
        if config.copy_on_assign {
            quote! {
                {
                    let initial_value: #value_ty = #expr;
                    ::atomic_property::Lock::<#value_ty>::#ctor(::atomic_property::Copying::copy(&initial_value))
                }
            }
        } else {
            quote! {
                ::atomic_property::Lock::<#value_ty>::#ctor(#expr)
            }
        }
    });

    vec![Peer {
        property: decl.name.clone(),
        value_ty: value_ty.clone(),
        ident: storage_ident(&decl.name),
        ty: quote!(::atomic_property::Lock<#value_ty>),
        construction,
    }]
}
