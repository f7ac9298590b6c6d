use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod to_message;

#[proc_macro_derive(ToMessage, attributes(message, field))]
pub fn derive_to_message(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match to_message::expand_to_message(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
