//! The two transformation entry points.
//!
//! Both validate the declaration first. On failure the diagnostics are on
//! `cx` and the result is empty; output is never partial.

use syn::Attribute;

use crate::config::Configuration;
use crate::diagnostic::ExpansionContext;
use crate::gen_accessors::{synthesize_accessors, Accessor};
use crate::gen_peers::{synthesize_peers, Peer};
use crate::parse::Declaration;
use crate::validate::validate;

pub fn expand_accessors(annotation: &Attribute, decl: &Declaration, cx: &mut ExpansionContext) -> Vec<Accessor> {
    let Some(inspected) = validate(decl, cx) else {
        return Vec::new();
    };
    let config = Configuration::from_attribute(annotation);
    synthesize_accessors(&inspected, &config)
}

pub fn expand_peers(annotation: &Attribute, decl: &Declaration, cx: &mut ExpansionContext) -> Vec<Peer> {
    let Some(inspected) = validate(decl, cx) else {
        return Vec::new();
    };
    let config = Configuration::from_attribute(annotation);
    synthesize_peers(&inspected, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen_accessors::AccessorKind;
    use proc_macro2::TokenStream;
    use quote::quote;

    fn run(tokens: TokenStream) -> (Vec<Accessor>, Vec<Peer>, ExpansionContext) {
        let decl: Declaration = syn::parse2(tokens).unwrap();
        let annotation = decl.annotation().expect("annotated declaration");
        let mut cx = ExpansionContext::new();
        let accessors = expand_accessors(annotation, &decl, &mut cx);
        let peers = expand_peers(annotation, &decl, &mut cx);
        (accessors, peers, cx)
    }

    fn rendered(accessors: &[Accessor], peers: &[Peer]) -> String {
        let constructions = peers.iter().filter_map(|p| p.construction.as_ref());
        quote!(#(#accessors)* #(#peers)* #(#constructions)*).to_string()
    }

    #[test]
    fn plain_number_without_initializer() {
        let (accessors, peers, cx) = run(quote! {
            #[atomic]
            pub let mut number: i32;
        });

        assert!(cx.diagnostics().is_empty());
        let kinds: Vec<_> = accessors.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [AccessorKind::Init, AccessorKind::Get, AccessorKind::Set]);
        assert_eq!(peers.len(), 1);
        assert!(peers[0].construction.is_none());
        assert!(accessors[0].tokens.to_string().contains("Lock :: < i32 > :: new (initial_value)"));
    }

    #[test]
    fn number_with_initializer() {
        let (accessors, peers, _) = run(quote! {
            #[atomic]
            pub let mut number: i32 = 100;
        });

        let kinds: Vec<_> = accessors.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [AccessorKind::Get, AccessorKind::Set]);
        assert_eq!(
            peers[0].construction.as_ref().map(|c| c.to_string()),
            Some(quote!(::atomic_property::Lock::<i32>::new(100)).to_string())
        );
    }

    #[test]
    fn copied_unchecked_reference_value() {
        let (accessors, peers, cx) = run(quote! {
            #[atomic(copy_on_assign = true, unchecked = true)]
            let mut attributed: Arc<String> = Arc::new(String::new());
        });

        assert!(cx.diagnostics().is_empty());
        assert_eq!(accessors.len(), 2);
        let get = accessors[0].tokens.to_string();
        let set = accessors[1].tokens.to_string();
        assert!(get.contains("with_lock_unchecked"));
        assert!(!get.contains("Copying"));
        assert!(set.contains("let copied = :: atomic_property :: Copying :: copy (& new_value) ;"));
        assert!(set.contains("with_lock_unchecked"));

        let construction = peers[0].construction.as_ref().expect("construction").to_string();
        assert!(construction.contains("new_unchecked"));
        assert!(construction.contains("let initial_value : Arc < String > = Arc :: new (String :: new ()) ;"));
        assert!(construction.contains("Copying :: copy (& initial_value)"));
    }

    #[test]
    fn rejected_declarations_produce_nothing() {
        for tokens in [
            quote! { #[atomic] let number: i32; },
            quote! { #[atomic] fn number() -> i32 { 0 } },
            quote! { #[atomic] let mut number: i32 { get { 0 } } },
            quote! { #[atomic] let mut number = 0; },
        ] {
            let (accessors, peers, cx) = run(tokens);
            assert!(accessors.is_empty());
            assert!(peers.is_empty());
            assert!(cx.has_errors());
        }
    }

    #[test]
    fn unknown_arguments_are_silent() {
        let (accessors, _, cx) = run(quote! {
            #[atomic(verbose = true, unchecked = false)]
            let mut number: i32;
        });
        assert!(cx.diagnostics().is_empty());
        assert!(!accessors[1].tokens.to_string().contains("unchecked"));
    }

    #[test]
    fn repeated_expansion_is_identical() {
        let tokens = quote! {
            #[atomic(copy_on_assign = true)]
            let mut label: Arc<String>;
        };
        let (a1, p1, _) = run(tokens.clone());
        let (a2, p2, _) = run(tokens);
        assert_eq!(rendered(&a1, &p1), rendered(&a2, &p2));
    }
}
