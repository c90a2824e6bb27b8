use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;

use crate::diagnostic::{Diagnostic, ExpansionContext};
use crate::expand::{expand_accessors, expand_peers};
use crate::gen_accessors::AccessorKind;
use crate::inspect;
use crate::parse::{AtomicStruct, Declaration, DeclarationKind, PropertyDecl};

/// Lint attributes that apply to the generated accessors.
const LINT_ATTRIBUTES: &[&str] = &["allow", "warn", "deny", "forbid", "expect"];

/// Pieces of the generated struct, collected in declaration order.
#[derive(Default)]
struct Assembly {
    fields: Vec<TokenStream>,
    params: Vec<TokenStream>,
    inits: Vec<TokenStream>,
    accessors: Vec<TokenStream>,
    methods: Vec<TokenStream>,
}

pub fn generate(parsed: &AtomicStruct, cx: &mut ExpansionContext) -> TokenStream {
    let mut assembly = Assembly::default();

    for decl in &parsed.declarations {
        match decl.annotation() {
            Some(annotation) => {
                let peers = expand_peers(annotation, decl, cx);
                if peers.is_empty() {
                    continue;
                }
                // Validation already ran above; its diagnostics are on `cx`.
                let accessors = expand_accessors(annotation, decl, &mut ExpansionContext::new());
                let mut docs = Vec::new();
                let mut lints = Vec::new();
                for attr in decl.forwarded_attrs() {
                    if attr.path().is_ident("doc") {
                        docs.push(attr);
                    } else if LINT_ATTRIBUTES.iter().any(|lint| attr.path().is_ident(lint)) {
                        lints.push(attr);
                    } else {
                        cx.diagnose(Diagnostic::error(
                            attr.span(),
                            "only doc comments and lint attributes can accompany #[atomic]",
                        ));
                    }
                }

                for peer in &peers {
                    assembly.fields.push(quote!(#peer));
                    let ident = &peer.ident;
                    match &peer.construction {
                        Some(construction) => assembly.inits.push(quote!(#ident: #construction)),
                        None => {
                            let Some(init) = accessors.iter().find(|a| a.kind == AccessorKind::Init) else {
                                continue;
                            };
                            let init = &init.ident;
                            let property = &peer.property;
                            let value_ty = &peer.value_ty;
                            assembly.params.push(quote!(#property: #value_ty));
                            assembly.inits.push(quote!(#ident: Self::#init(#property)));
                        }
                    }
                }

                for accessor in &accessors {
                    let tokens = match accessor.kind {
                        AccessorKind::Init => quote!(#accessor),
                        AccessorKind::Get => quote!(#(#docs)* #(#lints)* #accessor),
                        AccessorKind::Set => quote!(#(#lints)* #accessor),
                    };
                    assembly.accessors.push(tokens);
                }
            }
            None => match &decl.kind {
                DeclarationKind::Property(property) => plain_property(decl, property, &mut assembly, cx),
                DeclarationKind::Function(item) => {
                    let mut item = item.clone();
                    item.attrs = decl.attrs.clone();
                    assembly.methods.push(quote!(#item));
                }
                DeclarationKind::Other(_) => cx.diagnose(Diagnostic::error(
                    decl.span(),
                    "only `let` properties and `fn` items are allowed inside `atomic!`",
                )),
            },
        }
    }

    let Assembly {
        fields,
        params,
        inits,
        accessors,
        methods,
    } = assembly;

    let attrs = &parsed.attrs;
    let vis = &parsed.vis;
    let struct_token = &parsed.struct_token;
    let name = &parsed.ident;
    let generics = &parsed.generics;
    let (impl_generics, ty_generics, where_clause) = parsed.generics.split_for_impl();
    let diagnostics = cx.to_tokens();

    // A hand-written `new` takes the name; the memberwise constructor stays
    // reachable from it as `memberwise`.
    let custom_new = parsed.declarations.iter().any(|decl| {
        decl.annotation().is_none()
            && matches!(&decl.kind, DeclarationKind::Function(item) if item.sig.ident == "new")
    });
    let (ctor, ctor_vis, ctor_attrs) = if custom_new {
        (format_ident!("memberwise"), quote!(), quote!(#[allow(dead_code)]))
    } else {
        (format_ident!("new"), quote!(#vis), quote!())
    };

    let new_doc = format!(
        "Create a new [`{}`], constructing each property's lock exactly once.",
        name
    );

    quote! {
        #(#attrs)*
        #vis #struct_token #name #generics #where_clause {
            #(#fields,)*
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #[doc = #new_doc]
            #[allow(clippy::too_many_arguments)]
            #ctor_attrs
            #ctor_vis fn #ctor(#(#params),*) -> Self {
                Self {
                    #(#inits,)*
                }
            }

            #(#accessors)*

            #(#methods)*
        }

        #diagnostics
    }
}

/// A property without `#[atomic]` becomes an ordinary field.
fn plain_property(decl: &Declaration, property: &PropertyDecl, assembly: &mut Assembly, cx: &mut ExpansionContext) {
    let inspected = match inspect::inspect(property) {
        Ok(inspected) => inspected,
        Err(diagnostic) => {
            cx.diagnose(diagnostic);
            return;
        }
    };

    if inspected.has_accessor_body {
        cx.diagnose(Diagnostic::error(
            decl.span(),
            "accessor blocks are not supported on properties inside `atomic!`",
        ));
        return;
    }

    let attrs = &decl.attrs;
    let vis = &inspected.vis;
    let name = &inspected.name;
    let ty = &inspected.ty;

    assembly.fields.push(quote!(#(#attrs)* #vis #name: #ty));
    match &inspected.initializer {
        Some(initializer) => {
            let expr = &initializer.expr;
            assembly.inits.push(quote!(#name: #expr));
        }
        None => {
            assembly.params.push(quote!(#name: #ty));
            assembly.inits.push(quote!(#name));
        }
    }
}
