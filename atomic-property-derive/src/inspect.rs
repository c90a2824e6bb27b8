use proc_macro2::{Delimiter, TokenStream, TokenTree};
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Expr, Ident, Pat, Type, Visibility};

use crate::diagnostic::Diagnostic;
use crate::parse::PropertyDecl;

/// A property initializer together with its textual echo.
pub struct Initializer {
    pub expr: Expr,
    /// Best-effort reconstruction of the source text, see [`echo`].
    pub text: String,
}

/// Facts extracted from a property declaration.
pub struct AnnotatedDeclaration {
    pub vis: Visibility,
    pub name: Ident,
    pub ty: Type,
    pub has_accessor_body: bool,
    pub initializer: Option<Initializer>,
}

impl AnnotatedDeclaration {
    pub fn identifier_name(&self) -> String {
        self.name.to_string()
    }

    pub fn declared_type_name(&self) -> String {
        echo(self.ty.to_token_stream())
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }
}

pub fn inspect(property: &PropertyDecl) -> Result<AnnotatedDeclaration, Diagnostic> {
    let name = match &property.pat {
        Pat::Ident(pat) if pat.by_ref.is_none() && pat.mutability.is_none() && pat.subpat.is_none() => {
            pat.ident.clone()
        }
        other => {
            return Err(Diagnostic::error(
                other.span(),
                "a property must bind a single identifier",
            ));
        }
    };

    let ty = match &property.ty {
        Some(ty) => (**ty).clone(),
        None => {
            return Err(Diagnostic::error(
                name.span(),
                format!("property `{}` needs an explicit type annotation", name),
            ));
        }
    };

    let initializer = property.init.as_ref().map(|expr| Initializer {
        expr: expr.clone(),
        text: echo(expr.to_token_stream()),
    });

    Ok(AnnotatedDeclaration {
        vis: property.vis.clone(),
        name,
        ty,
        has_accessor_body: property.accessors.is_some(),
        initializer,
    })
}

/// Concatenate the text of every leaf token, left to right.
///
/// No whitespace is inserted except a single space between two adjacent
/// identifiers or literals. Only reliable for simple literals and calls.
pub fn echo(tokens: TokenStream) -> String {
    let mut out = String::new();
    let mut word_last = false;
    echo_into(tokens, &mut out, &mut word_last);
    out
}

fn echo_into(tokens: TokenStream, out: &mut String, word_last: &mut bool) {
    for tree in tokens {
        match tree {
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::None => ("", ""),
                };
                out.push_str(open);
                *word_last = false;
                echo_into(group.stream(), out, word_last);
                out.push_str(close);
                *word_last = false;
            }
            TokenTree::Ident(ident) => {
                push_word(out, word_last, &ident.to_string());
            }
            TokenTree::Literal(literal) => {
                push_word(out, word_last, &literal.to_string());
            }
            TokenTree::Punct(punct) => {
                out.push(punct.as_char());
                *word_last = false;
            }
        }
    }
}

fn push_word(out: &mut String, word_last: &mut bool, word: &str) {
    if *word_last {
        out.push(' ');
    }
    out.push_str(word);
    *word_last = true;
}

/// Whether [`echo`] may not reproduce this initializer faithfully.
pub fn echo_is_unreliable(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Group(group) => {
            group.delimiter() == Delimiter::Brace || echo_is_unreliable(group.stream())
        }
        TokenTree::Literal(literal) => {
            let text = literal.to_string();
            text.contains('"') && text.trim_matches('"').contains(['{', '}', '(', ')', '[', ']', ',', ';'])
        }
        _ => false,
    })
}
