use crate::utils::{apply_derives, assign_key, expect_bool};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.default {
        required.insert(2, syn::parse_quote!(Default));
    }
    if cfg.ord {
        required.push(syn::parse_quote!(PartialOrd));
        required.push(syn::parse_quote!(Ord));
        required.push(syn::parse_quote!(Hash));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

struct ValueObjectConfig {
    default: bool,
    ord: bool,
}

impl Parse for ValueObjectConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut default: Option<bool> = None;
        let mut ord: Option<bool> = None;

        let pairs = Punctuated::<syn::ExprAssign, Token![,]>::parse_terminated(input)?;
        for assign in pairs {
            let key = assign_key(&assign)?;
            let slot = match key.to_string().as_str() {
                "default" => &mut default,
                "ord" => &mut ord,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key in attribute; expected 'default' | 'ord'",
                    ));
                }
            };
            if slot.is_some() {
                return Err(syn::Error::new(
                    key.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            *slot = Some(expect_bool(&assign.right, &key.to_string())?);
        }

        Ok(Self {
            default: default.unwrap_or(true),
            ord: ord.unwrap_or(false),
        })
    }
}
