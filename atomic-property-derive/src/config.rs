use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Lit, Meta, Token};

/// Flags read from `#[atomic(..)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Copy incoming values with `Copying::copy` before storing them.
    pub copy_on_assign: bool,
    /// Use the unchecked lock constructor and acquisition.
    pub unchecked: bool,
}

impl Configuration {
    /// Parse the annotation's arguments.
    ///
    /// Only `label = true` sets a flag. Unknown labels, `false`, non-literal
    /// values and malformed argument lists are ignored without a diagnostic.
    pub fn from_attribute(attr: &Attribute) -> Self {
        let mut config = Self::default();

        let Meta::List(list) = &attr.meta else {
            return config;
        };
        let Ok(args) = list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) else {
            return config;
        };

        for arg in &args {
            let Expr::Assign(assign) = arg else {
                continue;
            };
            let Expr::Path(label) = &*assign.left else {
                continue;
            };
            let Expr::Lit(value) = &*assign.right else {
                continue;
            };
            let Lit::Bool(value) = &value.lit else {
                continue;
            };
            if !value.value {
                continue;
            }

            if label.path.is_ident("copy_on_assign") {
                config.copy_on_assign = true;
            } else if label.path.is_ident("unchecked") {
                config.unchecked = true;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn config(attr: Attribute) -> Configuration {
        Configuration::from_attribute(&attr)
    }

    #[test]
    fn bare_annotation_defaults_to_false() {
        assert_eq!(config(parse_quote!(#[atomic])), Configuration::default());
        assert_eq!(config(parse_quote!(#[atomic()])), Configuration::default());
    }

    #[test]
    fn true_literals_set_flags() {
        let both = config(parse_quote!(#[atomic(copy_on_assign = true, unchecked = true)]));
        assert!(both.copy_on_assign);
        assert!(both.unchecked);

        let one = config(parse_quote!(#[atomic(unchecked = true)]));
        assert!(!one.copy_on_assign);
        assert!(one.unchecked);
    }

    #[test]
    fn other_arguments_are_ignored() {
        let parsed = config(parse_quote!(#[atomic(
            copy_on_assign = false,
            unchecked = FLAG,
            verbose = true,
            unchecked,
            "copy_on_assign" = true,
        )]));
        assert_eq!(parsed, Configuration::default());
    }

    #[test]
    fn malformed_arguments_are_ignored() {
        assert_eq!(config(parse_quote!(#[atomic = "yes"])), Configuration::default());
        assert_eq!(config(parse_quote!(#[atomic(; ;)])), Configuration::default());
    }
}
