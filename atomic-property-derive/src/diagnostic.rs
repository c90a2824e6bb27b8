use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A machine-applicable replacement attached to a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct FixIt {
    pub description: String,
    pub span: Span,
    pub replacement: String,
}

impl FixIt {
    pub fn replace(description: impl Into<String>, span: Span, replacement: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            span,
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub span: Span,
    pub fix_it: Option<FixIt>,
}

impl Diagnostic {
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            span,
            fix_it: None,
        }
    }

    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            span,
            fix_it: None,
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_it = Some(fix_it);
        self
    }

    /// Full message text including the fix-it, if any, as a `help:` line.
    pub fn rendered(&self) -> String {
        match &self.fix_it {
            Some(fix) => format!("{}\nhelp: {}: `{}`", self.message, fix.description, fix.replacement),
            None => self.message.clone(),
        }
    }

    /// Lower to tokens the compiler reports.
    ///
    /// Errors become `compile_error!`, with the fix-it as a second error at
    /// the replacement span. Stable Rust has no warning API for procedural
    /// macros, so warnings are raised as a deprecation on a hidden constant
    /// used at the diagnostic's span.
    pub fn to_tokens(&self) -> TokenStream {
        match self.severity {
            Severity::Error => {
                let mut error = syn::Error::new(self.span, &self.message);
                if let Some(fix) = &self.fix_it {
                    error.combine(syn::Error::new(
                        fix.span,
                        format!("help: {}: `{}`", fix.description, fix.replacement),
                    ));
                }
                error.to_compile_error()
            }
            Severity::Warning => {
                let text = self.rendered();
                let usage = quote_spanned!(self.span=> atomic_property_warning);
                quote! {
                    const _: () = {
                        #[deprecated(note = #text)]
                        #[allow(non_upper_case_globals)]
                        const atomic_property_warning: () = ();
                        #usage
                    };
                }
            }
        }
    }
}

/// Collects diagnostics for one macro invocation.
#[derive(Debug, Default)]
pub struct ExpansionContext {
    diagnostics: Vec<Diagnostic>,
}

impl ExpansionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    #[cfg(test)]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[cfg(test)]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let lowered = self.diagnostics.iter().map(Diagnostic::to_tokens);
        quote!(#(#lowered)*)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_it_is_rendered_as_help_line() {
        let diagnostic = Diagnostic::error(Span::call_site(), "needs a mutable binding")
            .with_fix_it(FixIt::replace("replace with", Span::call_site(), "let mut"));
        assert_eq!(
            diagnostic.rendered(),
            "needs a mutable binding\nhelp: replace with: `let mut`"
        );
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut cx = ExpansionContext::new();
        cx.diagnose(Diagnostic::warning(Span::call_site(), "echo may be lossy"));
        assert!(!cx.has_errors());
        assert!(cx.to_tokens().to_string().contains("deprecated"));

        cx.diagnose(Diagnostic::error(Span::call_site(), "no"));
        assert!(cx.has_errors());
        assert_eq!(cx.diagnostics().len(), 2);
        assert!(cx.to_tokens().to_string().contains("compile_error"));
    }
}
