//! 商店 API 接缝
//!
//! 传输层（HTTP）不在本 crate 内实现；任何实现都需自行处理超时与取消，
//! 在返回后才由调用方发出事件。
//!
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_domain::model::{Order, OrderResult, ProductItem};

/// 列表响应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> ApiListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[async_trait]
pub trait ShopApi: Send + Sync {
    /// 商品列表；图片地址已补全 CDN 前缀
    async fn get_product_list(&self) -> AppResult<Vec<ProductItem>>;

    async fn get_product_item(&self, id: &str) -> AppResult<ProductItem>;

    async fn order_products(&self, order: &Order) -> AppResult<OrderResult>;
}
