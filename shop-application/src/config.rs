//! 店面配置
//!
//! `API_ORIGIN` 决定 API 与 CDN 地址：
//! - `api_url = {origin}/api/weblarek`
//! - `cdn_url = {origin}/content/weblarek`
//!
use bon::Builder;

pub const DEFAULT_API_ORIGIN: &str = "http://localhost:3000";

const API_PATH: &str = "/api/weblarek";
const CDN_PATH: &str = "/content/weblarek";

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// API 源地址（不含路径）
    #[builder(into, default = DEFAULT_API_ORIGIN.to_string())]
    api_origin: String,
    /// 以 `observe_all` 记录所有事件
    #[builder(default)]
    trace_events: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ShopConfig {
    /// 读取 `API_ORIGIN` 与 `SHOP_TRACE_EVENTS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_origin = lookup("API_ORIGIN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ORIGIN.to_string());
        let trace_events = lookup("SHOP_TRACE_EVENTS").is_some_and(|v| parse_flag(&v));

        Self::builder()
            .api_origin(api_origin)
            .trace_events(trace_events)
            .build()
    }

    pub fn api_origin(&self) -> &str {
        self.api_origin.trim_end_matches('/')
    }

    pub fn api_url(&self) -> String {
        format!("{}{API_PATH}", self.api_origin())
    }

    pub fn cdn_url(&self) -> String {
        format!("{}{CDN_PATH}", self.api_origin())
    }

    pub fn trace_events(&self) -> bool {
        self.trace_events
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn urls_are_derived_from_origin() {
        let cfg = ShopConfig::builder()
            .api_origin("https://shop.example/")
            .build();
        assert_eq!(cfg.api_url(), "https://shop.example/api/weblarek");
        assert_eq!(cfg.cdn_url(), "https://shop.example/content/weblarek");
        assert!(!cfg.trace_events());
    }

    #[test]
    fn lookup_reads_origin_and_trace_flag() {
        let env: HashMap<&str, &str> =
            HashMap::from([("API_ORIGIN", "https://api.test"), ("SHOP_TRACE_EVENTS", "Yes")]);
        let cfg = ShopConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.api_origin(), "https://api.test");
        assert!(cfg.trace_events());
    }

    #[test]
    fn missing_or_blank_origin_falls_back_to_default() {
        let cfg = ShopConfig::from_lookup(|k| (k == "API_ORIGIN").then(|| "  ".to_string()));
        assert_eq!(cfg, ShopConfig::default());
        assert_eq!(cfg.api_origin(), DEFAULT_API_ORIGIN);
    }
}
