use proc_macro::TokenStream;
use syn::parse_macro_input;

mod config;
mod diagnostic;
mod expand;
mod gen_accessors;
mod gen_peers;
mod gen_struct;
mod inspect;
mod parse;
mod validate;

/// Define a struct whose `#[atomic]` properties are stored behind a lock.
///
/// See the `atomic-property` crate for the full surface and generated API.
#[proc_macro]
pub fn atomic(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as parse::AtomicStruct);
    let mut cx = diagnostic::ExpansionContext::new();
    gen_struct::generate(&parsed, &mut cx).into()
}
