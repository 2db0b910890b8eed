use crate::utils::{apply_derives, assign_key};
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse_macro_input};

/// #[event_names] 宏实现
/// - 仅支持单元变体；
/// - 追加派生：Debug, Clone, Copy, PartialEq, Eq, Hash；
/// - 变体级 `#[event(name = "...")]` 覆写事件名，缺省 `Enum.Variant`；
/// - 同一枚举内事件名重复时报编译错误。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[event_names] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = parse_macro_input!(item as Item);
    let enum_item = match &mut input {
        Item::Enum(e) => e,
        other => {
            return syn::Error::new(other.span(), "#[event_names] can only be used on enum types")
                .to_compile_error()
                .into();
        }
    };

    apply_derives(
        &mut enum_item.attrs,
        vec![
            syn::parse_quote!(Debug),
            syn::parse_quote!(Clone),
            syn::parse_quote!(Copy),
            syn::parse_quote!(PartialEq),
            syn::parse_quote!(Eq),
            syn::parse_quote!(Hash),
        ],
    );

    let enum_name = enum_item.ident.to_string();
    let mut names: Vec<(syn::Ident, syn::LitStr)> = Vec::new();
    let mut seen: HashMap<String, syn::Ident> = HashMap::new();

    for v in &mut enum_item.variants {
        if !matches!(v.fields, syn::Fields::Unit) {
            return syn::Error::new(
                v.span(),
                "#[event_names] supports only unit variants, e.g., ItemsChanged",
            )
            .to_compile_error()
            .into();
        }

        let mut name: Option<syn::LitStr> = None;
        let mut retained = Vec::new();
        for attr in v.attrs.drain(..) {
            if !attr.path().is_ident("event") {
                retained.push(attr);
                continue;
            }
            match parse_variant_name(&attr) {
                Ok(lit) if name.is_none() => name = Some(lit),
                Ok(_) => {
                    return syn::Error::new(
                        attr.span(),
                        "duplicate 'name' specified for this variant",
                    )
                    .to_compile_error()
                    .into();
                }
                Err(err) => return err.to_compile_error().into(),
            }
        }
        v.attrs = retained;

        let lit = name.unwrap_or_else(|| {
            syn::LitStr::new(&format!("{}.{}", enum_name, v.ident), v.ident.span())
        });
        if let Some(prev) = seen.insert(lit.value(), v.ident.clone()) {
            return syn::Error::new(
                lit.span(),
                format!("event name '{}' is already used by {}", lit.value(), prev),
            )
            .to_compile_error()
            .into();
        }
        names.push((v.ident.clone(), lit));
    }

    let ident = &enum_item.ident;
    let variants: Vec<_> = names.iter().map(|(v, _)| v).collect();
    let as_str_arms = names.iter().map(|(v, lit)| quote! { Self::#v => #lit });
    let parse_arms = names.iter().map(|(v, lit)| quote! { #lit => ::std::result::Result::Ok(Self::#v) });

    let out = quote! {
        #enum_item

        impl #ident {
            /// 全部事件名（声明顺序）
            pub const ALL: &'static [Self] = &[#( Self::#variants ),*];

            /// 事件名字符串
            pub const fn as_str(&self) -> &'static str {
                match self { #( #as_str_arms, )* }
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::convert::AsRef<str> for #ident {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::str::FromStr for #ident {
            type Err = ::shop_domain::error::DomainError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    #( #parse_arms, )*
                    other => ::std::result::Result::Err(::shop_domain::error::DomainError::UnknownEvent {
                        name: other.to_string(),
                    }),
                }
            }
        }

        impl ::std::convert::From<#ident> for ::shop_domain::eventing::Matcher {
            fn from(value: #ident) -> Self {
                ::shop_domain::eventing::Matcher::Exact(value.as_str().to_string())
            }
        }
    };

    TokenStream::from(out)
}

fn parse_variant_name(attr: &syn::Attribute) -> Result<syn::LitStr> {
    let pairs = attr.parse_args_with(Punctuated::<syn::ExprAssign, Token![,]>::parse_terminated)?;

    let mut name: Option<syn::LitStr> = None;
    for assign in pairs {
        let key = assign_key(&assign)?;
        if key != "name" {
            return Err(syn::Error::new(key.span(), "unknown key; expected 'name'"));
        }
        if name.is_some() {
            return Err(syn::Error::new(key.span(), "duplicate key 'name' in attribute"));
        }
        match *assign.right {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => {
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "event name must not be empty"));
                }
                name = Some(lit);
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected string literal for 'name'",
                ));
            }
        }
    }

    name.ok_or_else(|| syn::Error::new(attr.span(), "expected #[event(name = \"...\")]"))
}
