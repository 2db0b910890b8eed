use crate::value_object::Price;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 目录商品
///
/// ```
/// use shop_domain::model::ProductItem;
/// use shop_domain::value_object::Price;
///
/// let item = ProductItem::builder()
///     .id("854cef69")
///     .title("Frontend bot")
///     .price(Price::new(750))
///     .build();
/// assert!(item.is_for_sale());
/// assert_eq!(item.category, "");
/// ```
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductItem {
    #[builder(into)]
    pub id: String,
    #[builder(into, default)]
    pub description: String,
    /// 图片地址；由 API 客户端补全 CDN 前缀
    #[builder(into, default)]
    pub image: String,
    #[builder(into)]
    pub title: String,
    #[builder(into, default)]
    pub category: String,
    #[builder(default)]
    pub price: Price,
}

impl ProductItem {
    pub fn is_for_sale(&self) -> bool {
        self.price.is_for_sale()
    }
}
