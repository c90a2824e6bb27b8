use quote::ToTokens;
use syn::spanned::Spanned;

use crate::diagnostic::{Diagnostic, ExpansionContext, FixIt};
use crate::inspect::{self, AnnotatedDeclaration};
use crate::parse::{Declaration, DeclarationKind};

/// Check that `decl` has the shape `#[atomic]` can transform.
///
/// Violations are reported on `cx` and yield `None`; no check aborts the
/// process.
pub fn validate(decl: &Declaration, cx: &mut ExpansionContext) -> Option<AnnotatedDeclaration> {
    let target = decl.annotation().map_or_else(|| decl.span(), |attr| attr.span());

    let DeclarationKind::Property(property) = &decl.kind else {
        cx.diagnose(Diagnostic::error(
            target,
            "#[atomic] can only be applied to a `let mut` property declaration",
        ));
        return None;
    };

    if property.mutability.is_none() {
        let span = property.let_token.span;
        cx.diagnose(
            Diagnostic::error(span, "#[atomic] requires a mutable binding")
                .with_fix_it(FixIt::replace("replace `let` with `let mut`", span, "let mut")),
        );
        return None;
    }

    if let Some(accessors) = &property.accessors {
        cx.diagnose(Diagnostic::error(
            accessors.brace.span.join(),
            "#[atomic] cannot be applied to a property that already declares accessors",
        ));
        return None;
    }

    let inspected = match inspect::inspect(property) {
        Ok(inspected) => inspected,
        Err(diagnostic) => {
            cx.diagnose(diagnostic);
            return None;
        }
    };

    if let Some(initializer) = &inspected.initializer {
        if inspect::echo_is_unreliable(initializer.expr.to_token_stream()) {
            cx.diagnose(Diagnostic::warning(
                initializer.expr.span(),
                format!(
                    "initializer of `{}: {}` is documented as `{}`, which may not match the source",
                    inspected.identifier_name(),
                    inspected.declared_type_name(),
                    initializer.text
                ),
            ));
        }
    }

    Some(inspected)
}
