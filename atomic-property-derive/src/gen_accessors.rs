use proc_macro2::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::Ident;

use crate::config::Configuration;
use crate::inspect::AnnotatedDeclaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Init,
    Get,
    Set,
}

/// One synthesized accessor: an associated fn of the generated impl block.
pub struct Accessor {
    pub kind: AccessorKind,
    pub ident: Ident,
    pub tokens: TokenStream,
}

impl ToTokens for Accessor {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.tokens.to_tokens(tokens);
    }
}

/// Backing field holding the property's lock: `_<name>`.
pub fn storage_ident(name: &Ident) -> Ident {
    format_ident!("_{}", name)
}

/// `Lock` constructor selected by `unchecked`.
pub fn constructor(config: &Configuration) -> Ident {
    if config.unchecked {
        format_ident!("new_unchecked")
    } else {
        format_ident!("new")
    }
}

/// `Lock` acquisition selected by `unchecked`.
pub fn acquisition(config: &Configuration) -> Ident {
    if config.unchecked {
        format_ident!("with_lock_unchecked")
    } else {
        format_ident!("with_lock")
    }
}

/// Accessors for `decl`: init, get and set, or only get and set when the
/// declaration carries an initializer.
pub fn synthesize_accessors(decl: &AnnotatedDeclaration, config: &Configuration) -> Vec<Accessor> {
    let get = generate_get(decl, config);
    let set = generate_set(decl, config);

    if decl.has_initializer() {
        vec![get, set]
    } else {
        vec![generate_init(decl, config), get, set]
    }
}

fn generate_init(decl: &AnnotatedDeclaration, config: &Configuration) -> Accessor {
    let ty = &decl.ty;
    let ident = format_ident!("init_{}", decl.name);
    let ctor = constructor(config);

    let body = if config.copy_on_assign {
        quote! {
            let copied = ::atomic_property::Copying::copy(&initial_value);
            ::atomic_property::Lock::<#ty>::#ctor(copied)
        }
    } else {
        quote! {
            ::atomic_property::Lock::<#ty>::#ctor(initial_value)
        }
    };

    let tokens = quote! {
        fn #ident(initial_value: #ty) -> ::atomic_property::Lock<#ty> {
            #body
        }
    };

    Accessor {
        kind: AccessorKind::Init,
        ident,
        tokens,
    }
}

fn generate_get(decl: &AnnotatedDeclaration, config: &Configuration) -> Accessor {
    let vis = &decl.vis;
    let ty = &decl.ty;
    let ident = decl.name.clone();
    let storage = storage_ident(&decl.name);
    let acquire = acquisition(config);

    let mut doc = format!("Returns a clone of `{}`, read under its lock.", decl.name);
    if let Some(initializer) = &decl.initializer {
        doc.push_str(&format!("\n\nInitialized to `{}`.", initializer.text));
    }

    let tokens = quote! {
        #[doc = #doc]
        #vis fn #ident(&self) -> #ty {
            self.#storage.#acquire(|value| ::core::clone::Clone::clone(value))
        }
    };

    Accessor {
        kind: AccessorKind::Get,
        ident,
        tokens,
    }
}

fn generate_set(decl: &AnnotatedDeclaration, config: &Configuration) -> Accessor {
    let vis = &decl.vis;
    let ty = &decl.ty;
    let ident = format_ident!("set_{}", decl.name);
    let storage = storage_ident(&decl.name);
    let acquire = acquisition(config);

    let mut doc = format!("Replaces `{}` under its lock.", decl.name);
    if config.copy_on_assign {
        doc.push_str(" The new value is copied with `Copying::copy` first.");
    }

    let body = if config.copy_on_assign {
        quote! {
            let copied = ::atomic_property::Copying::copy(&new_value);
            self.#storage.#acquire(|value| *value = copied);
        }
    } else {
        quote! {
            self.#storage.#acquire(|value| *value = new_value);
        }
    };

    let tokens = quote! {
        #[doc = #doc]
        #vis fn #ident(&self, new_value: #ty) {
            #body
        }
    };

    Accessor {
        kind: AccessorKind::Set,
        ident,
        tokens,
    }
}
