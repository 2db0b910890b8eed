//! 应用状态：目录 + 结算会话
//!
//! 目录与预览变更分别发出 `items:changed` / `preview:changed`；
//! 表单按步骤校验，每次校验都发出 `formErrors:change`（映射可能为空），
//! 两个步骤均有效后发出 `order:ready`。
//! 错误映射按步骤合并：校验某一步骤只替换该步骤的条目，另一步骤的条目保留。
//!
//! 订单商品不在此处保存：购物车是唯一来源，结算时由 `order_for` 派生。
//!
use super::basket::Basket;
use super::order::{Order, OrderForm};
use super::product::ProductItem;
use crate::domain_event::{ShopBus, ShopEvent, ShopPayload};
use crate::entity::{ReactiveEntity, Snapshot};
use crate::error::{DomainError, DomainResult};
use crate::value_object::{CheckoutStep, FormErrors, OrderField, ValueObject};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub catalog: Vec<ProductItem>,
    /// 预览商品 id
    pub preview: Option<String>,
    pub order: OrderForm,
    pub form_errors: FormErrors,
    /// 无法写入表单的输入（如不支持的支付方式），修正前每次校验都会带上
    pub rejected_input: FormErrors,
}

impl Snapshot<ShopPayload> for AppData {
    fn snapshot(&self) -> ShopPayload {
        ShopPayload::Catalog {
            catalog: self.catalog.clone(),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    entity: ReactiveEntity<AppData, ShopPayload>,
}

impl AppState {
    pub fn new(bus: Arc<ShopBus>) -> Self {
        Self {
            entity: ReactiveEntity::new(AppData::default(), bus),
        }
    }

    /// 从已保存的部分数据恢复（未知字段忽略）
    pub fn restore(data: serde_json::Value, bus: Arc<ShopBus>) -> DomainResult<Self> {
        Ok(Self {
            entity: ReactiveEntity::from_partial(data, bus)?,
        })
    }

    pub fn set_catalog(&self, items: Vec<ProductItem>) -> DomainResult<()> {
        let count = items.len();
        self.entity.update(|s| s.catalog = items);
        tracing::debug!(count, "catalog replaced");
        self.entity.notify(ShopEvent::ItemsChanged, None)
    }

    pub fn catalog(&self) -> Vec<ProductItem> {
        self.entity.read(|s| s.catalog.clone())
    }

    pub fn product(&self, id: &str) -> Option<ProductItem> {
        self.entity
            .read(|s| s.catalog.iter().find(|it| it.id == id).cloned())
    }

    pub fn set_preview(&self, item: ProductItem) -> DomainResult<()> {
        self.entity.update(|s| s.preview = Some(item.id.clone()));
        self.entity
            .notify(ShopEvent::PreviewChanged, Some(ShopPayload::Product(item)))
    }

    /// 当前预览商品（按 id 在目录中查找）
    pub fn preview(&self) -> Option<ProductItem> {
        self.entity.read(|s| {
            let id = s.preview.as_deref()?;
            s.catalog.iter().find(|it| it.id == id).cloned()
        })
    }

    pub fn order(&self) -> OrderForm {
        self.entity.read(|s| s.order.clone())
    }

    pub fn form_errors(&self) -> FormErrors {
        self.entity.read(|s| s.form_errors.clone())
    }

    /// 写入表单字段并重新校验该字段所属的步骤，返回该步骤是否有效
    ///
    /// 无法识别的支付方式不会写入，以错误信息形式出现在 `formErrors:change` 中，
    /// 直到该字段被成功写入为止。
    pub fn set_order_field(&self, field: OrderField, value: &str) -> DomainResult<bool> {
        self.entity.update(|s| match s.order.set(field, value) {
            Ok(()) => {
                s.rejected_input.remove(field);
            }
            Err(err) => {
                let message = match err {
                    DomainError::InvalidValue { reason } => reason,
                    other => other.to_string(),
                };
                s.rejected_input.insert(field, message);
            }
        });

        let step_valid = self.validate_step(field.step())?;
        if step_valid {
            let form = self.order();
            if form.validate().is_ok() {
                tracing::debug!("order form ready");
                self.entity
                    .notify(ShopEvent::OrderReady, Some(ShopPayload::OrderForm(form)))?;
            }
        }
        Ok(step_valid)
    }

    /// 校验联系方式步骤（邮箱、电话）
    pub fn validate_order(&self) -> DomainResult<bool> {
        self.validate_step(CheckoutStep::Contacts)
    }

    /// 校验配送步骤（支付方式、地址）
    pub fn validate_delivery(&self) -> DomainResult<bool> {
        self.validate_step(CheckoutStep::Delivery)
    }

    // 发出的映射包含两个步骤的最新结果，返回值只反映本步骤
    fn validate_step(&self, step: CheckoutStep) -> DomainResult<bool> {
        let (valid, errors) = self.entity.update(|s| {
            let mut own = s.order.validate_step(step);
            for (field, message) in s.rejected_input.for_step(step).iter() {
                own.insert(field, message);
            }
            let valid = own.is_empty();
            s.form_errors.replace_step(step, own);
            (valid, s.form_errors.clone())
        });

        self.entity
            .notify(ShopEvent::FormErrorsChanged, Some(ShopPayload::FormErrors(errors)))?;
        Ok(valid)
    }

    /// 以购物车内容生成订单：只含可售商品，合计为其价格之和
    pub fn order_for(&self, basket: &Basket) -> DomainResult<Order> {
        let items: Vec<ProductItem> = basket
            .items()
            .into_iter()
            .filter(ProductItem::is_for_sale)
            .collect();
        if items.is_empty() {
            return Err(DomainError::invalid_state("basket is empty"));
        }

        let total = items.iter().map(|it| it.price.value_or_zero()).sum();
        let ids = items.into_iter().map(|it| it.id).collect();
        Order::new(self.order(), ids, total).map_err(|err| match err {
            DomainError::InvalidCommand { reason } => DomainError::InvalidState { reason },
            other => other,
        })
    }

    /// 下单成功后重置表单（静默）
    pub fn reset_order(&self) {
        self.entity.update(|s| {
            s.order = OrderForm::default();
            s.form_errors = FormErrors::default();
            s.rejected_input = FormErrors::default();
        });
    }
}
