use proc_macro2::{Span, TokenStream};
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{braced, token, Attribute, Expr, Generics, Ident, Item, Pat, Token, Type, Visibility};

/// Name of the annotation that marks a property for transformation.
pub const ANNOTATION: &str = "atomic";

/// `{ ... }` written after a property's type. Its contents are skipped.
pub struct AccessorBlock {
    pub brace: token::Brace,
}

/// `vis let [mut] pat [: Type] [= expr] [{ ... }];`
///
/// A struct literal initializer must be parenthesized, otherwise its braces
/// are read as an accessor block.
pub struct PropertyDecl {
    pub vis: Visibility,
    pub let_token: Token![let],
    pub mutability: Option<Token![mut]>,
    pub pat: Pat,
    pub ty: Option<Box<Type>>,
    pub init: Option<Expr>,
    pub accessors: Option<AccessorBlock>,
}

pub enum DeclarationKind {
    Property(PropertyDecl),
    Function(syn::ItemFn),
    Other(Item),
}

/// One declaration inside an `atomic!` struct body.
pub struct Declaration {
    pub attrs: Vec<Attribute>,
    pub kind: DeclarationKind,
}

impl Declaration {
    /// The first `#[atomic]` / `#[atomic(..)]` attribute, if any.
    pub fn annotation(&self) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.path().is_ident(ANNOTATION))
    }

    /// Attributes other than the annotation, forwarded to generated code.
    pub fn forwarded_attrs(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter().filter(|a| !a.path().is_ident(ANNOTATION))
    }

    pub fn span(&self) -> Span {
        match &self.kind {
            DeclarationKind::Property(property) => property.let_token.span,
            DeclarationKind::Function(item) => item.sig.ident.span(),
            DeclarationKind::Other(item) => item.span(),
        }
    }
}

impl Parse for Declaration {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;

        let ahead = input.fork();
        ahead.parse::<Visibility>()?;
        if !ahead.peek(Token![let]) {
            let kind = match input.parse::<Item>()? {
                Item::Fn(item) => DeclarationKind::Function(item),
                other => DeclarationKind::Other(other),
            };
            return Ok(Self { attrs, kind });
        }

        let vis = input.parse()?;
        let let_token = input.parse()?;
        let mutability = input.parse()?;
        let pat = Pat::parse_single(input)?;

        let ty = if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            Some(Box::new(input.parse()?))
        } else {
            None
        };

        let init = if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Some(Expr::parse_without_eager_brace(input)?)
        } else {
            None
        };

        let accessors = if input.peek(token::Brace) {
            let content;
            let brace = braced!(content in input);
            content.parse::<TokenStream>()?;
            Some(AccessorBlock { brace })
        } else {
            None
        };

        if accessors.is_some() {
            input.parse::<Option<Token![;]>>()?;
        } else {
            input.parse::<Token![;]>()?;
        }

        Ok(Self {
            attrs,
            kind: DeclarationKind::Property(PropertyDecl {
                vis,
                let_token,
                mutability,
                pat,
                ty,
                init,
                accessors,
            }),
        })
    }
}

/// The struct handed to `atomic!`.
pub struct AtomicStruct {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub struct_token: Token![struct],
    pub ident: Ident,
    pub generics: Generics,
    pub declarations: Vec<Declaration>,
}

impl Parse for AtomicStruct {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        let struct_token = input.parse()?;
        let ident = input.parse()?;
        let mut generics: Generics = input.parse()?;
        generics.where_clause = input.parse()?;

        let content;
        braced!(content in input);
        let mut declarations = Vec::new();
        while !content.is_empty() {
            declarations.push(content.parse()?);
        }

        Ok(Self {
            attrs,
            vis,
            struct_token,
            ident,
            generics,
            declarations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn property(decl: &Declaration) -> &PropertyDecl {
        match &decl.kind {
            DeclarationKind::Property(property) => property,
            _ => panic!("expected a property declaration"),
        }
    }

    #[test]
    fn parses_full_property() {
        let decl: Declaration = syn::parse2(quote! {
            #[atomic(unchecked = true)]
            pub let mut number: i32 = 100;
        })
        .unwrap();

        assert!(decl.annotation().is_some());
        let property = property(&decl);
        assert!(property.mutability.is_some());
        assert!(property.ty.is_some());
        assert!(property.init.is_some());
        assert!(property.accessors.is_none());
    }

    #[test]
    fn parses_accessor_block_after_initializer() {
        let decl: Declaration = syn::parse2(quote! {
            let mut label: Label = Label::new() { get { todo!() } };
        })
        .unwrap();

        let property = property(&decl);
        assert!(property.init.is_some());
        assert!(property.accessors.is_some());
    }

    #[test]
    fn non_let_items_are_kept_by_kind() {
        let func: Declaration = syn::parse2(quote! {
            #[atomic]
            pub fn number(&self) -> i32 { 0 }
        })
        .unwrap();
        assert!(matches!(func.kind, DeclarationKind::Function(_)));
        assert!(func.annotation().is_some());

        let other: Declaration = syn::parse2(quote! { struct Inner; }).unwrap();
        assert!(matches!(other.kind, DeclarationKind::Other(_)));
    }

    #[test]
    fn parses_generic_container() {
        let parsed: AtomicStruct = syn::parse2(quote! {
            /// Docs.
            pub struct Slot<T> where T: Clone {
                #[atomic]
                pub let mut value: T;
                pub let mut hits: u64 = 0;
                pub fn hits(&self) -> u64 { self.hits }
            }
        })
        .unwrap();

        assert_eq!(parsed.ident, "Slot");
        assert_eq!(parsed.attrs.len(), 1);
        assert!(parsed.generics.where_clause.is_some());
        assert_eq!(parsed.declarations.len(), 3);
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let result = syn::parse2::<Declaration>(quote! { let mut number: i32 });
        assert!(result.is_err());
    }
}
