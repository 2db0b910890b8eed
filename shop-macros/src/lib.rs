//! 商店领域过程宏（shop-macros）
//!
//! - `#[value_object]`：为值对象合并/追加常用派生；
//! - `#[event_names]`：将单元变体枚举展开为封闭的事件名集合，
//!   生成 `as_str/ALL/Display/FromStr` 以及到 `Matcher` 的转换。
//!
use proc_macro::TokenStream;

mod event_names;
mod utils;
mod value_object;

/// 值对象宏
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Debug, Clone, PartialEq, Eq, Serialize, Deserialize
/// - 参数：`#[value_object(default = true|false, ord = true|false)]`
///   - `default`：是否派生 `Default`，默认 true（枚举需自行标注 `#[default]`）
///   - `ord`：是否追加 `PartialOrd, Ord, Hash`，默认 false
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 事件名宏
/// - 仅支持单元变体枚举：`enum ShopEvent { ItemsChanged, .. }`
/// - 变体可通过 `#[event(name = "items:changed")]` 指定事件名，缺省为 `Enum.Variant`
/// - 生成 `::shop_domain::eventing::Matcher` 的 `From` 实现与基于
///   `::shop_domain::error::DomainError` 的 `FromStr` 实现
#[proc_macro_attribute]
pub fn event_names(attr: TokenStream, item: TokenStream) -> TokenStream {
    event_names::expand(attr, item)
}
