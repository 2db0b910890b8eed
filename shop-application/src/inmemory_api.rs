use crate::api::{ApiListResponse, ShopApi};
use crate::config::ShopConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use dashmap::DashMap;
use shop_domain::model::{Order, OrderResult, ProductItem};
use std::sync::atomic::{AtomicBool, Ordering};

/// 基于内存的 ShopApi 实现
/// - 目录在构造时给定，图片以相对路径保存，读取时补全 CDN 前缀；
/// - 下单时校验商品与合计，成功的订单保存在 `DashMap` 中；
/// - `set_offline(true)` 模拟网络不可用。
#[derive(Debug)]
pub struct InMemoryShopApi {
    cdn_url: String,
    catalog: Vec<ProductItem>,
    orders: DashMap<String, Order>,
    offline: AtomicBool,
}

impl InMemoryShopApi {
    pub fn new(cdn_url: impl Into<String>, catalog: Vec<ProductItem>) -> Self {
        Self {
            cdn_url: cdn_url.into(),
            catalog,
            orders: DashMap::new(),
            offline: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ShopConfig, catalog: Vec<ProductItem>) -> Self {
        Self::new(config.cdn_url(), catalog)
    }

    /// 原始列表响应（未补全 CDN 前缀）
    pub fn list_response(&self) -> ApiListResponse<ProductItem> {
        ApiListResponse::new(self.catalog.clone())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        self.orders.get(id).map(|o| o.clone())
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    fn ensure_online(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Api("network unavailable".into()));
        }
        Ok(())
    }

    fn with_cdn(&self, item: &ProductItem) -> ProductItem {
        ProductItem {
            image: format!("{}{}", self.cdn_url, item.image),
            ..item.clone()
        }
    }

    fn find(&self, id: &str) -> Option<&ProductItem> {
        self.catalog.iter().find(|it| it.id == id)
    }

    fn check_order(&self, order: &Order) -> AppResult<u64> {
        if order.items.is_empty() {
            return Err(AppError::Validation("order has no items".into()));
        }

        let mut total = 0u64;
        for id in &order.items {
            let item = self
                .find(id)
                .ok_or_else(|| AppError::ProductNotFound(id.clone()))?;
            let Some(price) = item.price.amount() else {
                return Err(AppError::Validation(format!("product {id} is not for sale")));
            };
            total += price;
        }

        if total != order.total {
            return Err(AppError::Validation(format!(
                "order total mismatch: expected {total}, got {}",
                order.total
            )));
        }
        Ok(total)
    }
}

#[async_trait]
impl ShopApi for InMemoryShopApi {
    async fn get_product_list(&self) -> AppResult<Vec<ProductItem>> {
        self.ensure_online()?;
        Ok(self
            .list_response()
            .items
            .iter()
            .map(|it| self.with_cdn(it))
            .collect())
    }

    async fn get_product_item(&self, id: &str) -> AppResult<ProductItem> {
        self.ensure_online()?;
        self.find(id)
            .map(|it| self.with_cdn(it))
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))
    }

    async fn order_products(&self, order: &Order) -> AppResult<OrderResult> {
        self.ensure_online()?;
        let total = self.check_order(order)?;

        let id = uuid::Uuid::new_v4().to_string();
        self.orders.insert(id.clone(), order.clone());
        tracing::info!(order_id = %id, total, "order accepted");

        Ok(OrderResult { id, total })
    }
}
