use quote::ToTokens;
use syn::{Attribute, Path, Token, punctuated::Punctuated};

// 把 `Serialize` 与 `serde::Serialize` 视为同一派生
fn derive_key(path: &Path) -> String {
    match path.segments.last() {
        Some(last) if last.ident == "Serialize" || last.ident == "Deserialize" => {
            format!("serde::{}", last.ident)
        }
        Some(last) => last.ident.to_string(),
        None => path.to_token_stream().to_string(),
    }
}

/// 将 `required` 派生与已有 `#[derive(..)]` 合并为单个属性（去重，required 在前），
/// 其余非 derive 属性原样保留在其后
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let mut others = Vec::with_capacity(attrs.len());
    let mut existing: Vec<Path> = Vec::new();

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        if let Ok(list) = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            existing.extend(list);
        }
    }

    let mut seen = std::collections::HashSet::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    attrs.push(syn::parse_quote!(#[derive(#(#merged),*)]));
    attrs.extend(others);
}

/// 解析 `key = <bool 字面量>`
pub(crate) fn expect_bool(expr: &syn::Expr, key: &str) -> syn::Result<bool> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new_spanned(
            other,
            format!("expected boolean literal for '{key}'"),
        )),
    }
}

/// 取出 `a = b` 形式中的单段键名
pub(crate) fn assign_key(assign: &syn::ExprAssign) -> syn::Result<syn::Ident> {
    match assign.left.as_ref() {
        syn::Expr::Path(p) if p.path.segments.len() == 1 => Ok(p.path.segments[0].ident.clone()),
        other => Err(syn::Error::new_spanned(other, "invalid attribute key")),
    }
}
