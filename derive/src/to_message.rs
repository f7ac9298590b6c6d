use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitInt, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_to_message(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`ToMessage` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`ToMessage` may only be derived on structs with named fields.",
        ))?
    };

    let Some(attr) = input.attrs.iter().find(|a| a.path().is_ident("message")) else {
        Err(Error::new_spanned(
            &input.ident,
            "`ToMessage` requires a `message` attribute naming the message type.",
        ))?
    };

    let kind: Ident = attr.meta.require_list()?.parse_args()?;

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten() // A struct field may supply any number of message fields.
        .collect::<Vec<_>>();

    let mut numbers = HashSet::new();

    for field in &fields {
        if !numbers.insert(field.number.base10_parse::<u8>()?) {
            Err(Error::new(
                field.number.span(),
                "Field identifiers must be unique.",
            ))?
        }
    }

    let assignments = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            number,
            handler,
        } = field;

        let value = if let Some((field_type, handler)) = handler {
            let output = &handler.output;
            let body = &handler.body;
            let arg = match handler.inputs.first() {
                Some(Pat::Type(typed)) => quote! { #typed },
                Some(pat) => quote! { #pat: &#field_type },
                None => quote! { _: &#field_type },
            };

            quote! { (|#arg| #output #body)(&self.#name) }
        } else {
            quote! { ::core::clone::Clone::clone(&self.#name) }
        };

        quote! {
            if let ::core::option::Option::Some(value) = #value {
                message.set_field(#number, value)?;
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::chainring::avec::ToMessage for #name {
            fn to_message(
                &self,
            ) -> ::core::result::Result<
                ::chainring::message::Message,
                ::chainring::message::MessageError,
            > {
                let mut message = ::chainring::message::Message::new(
                    ::chainring::profile::MessageType::#kind,
                );

                #(#assignments)*

                ::core::result::Result::Ok(message)
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    number: LitInt,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Vec<Self>> {
        let Some(name) = &field.ident else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let attrs = field.attrs.iter().filter(|a| a.path().is_ident("field"));

        attrs
            .map(|attr| -> Result<Self> {
                let FieldAttribute { number, handler } = attr.meta.require_list()?.parse_args()?;

                if let Some(handler) = &handler {
                    if handler.inputs.len() != 1 {
                        Err(Error::new_spanned(
                            handler,
                            "Handler closure must have one parameter.",
                        ))?
                    }
                } else {
                    check_option(&field.ty)?;
                }

                let handler = handler.map(|h| (field.ty.clone(), h));

                Ok(Self {
                    name: name.clone(),
                    number,
                    handler,
                })
            })
            .collect()
    }
}

/// Require a type of the form `Option<T>`.
fn check_option(ty: &Type) -> Result<()> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(_)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(())
}

#[derive(Debug)]
struct FieldAttribute {
    number: LitInt,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let number = input.parse::<LitInt>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { number, handler })
    }
}
