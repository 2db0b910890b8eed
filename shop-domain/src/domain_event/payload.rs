use crate::model::{BasketSnapshot, OrderForm, OrderResult, ProductItem};
use crate::value_object::{FormErrors, OrderField};
use serde::{Deserialize, Serialize};

/// 店面事件载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ShopPayload {
    /// 无数据（打开/关闭类事件）
    Empty,
    Catalog { catalog: Vec<ProductItem> },
    Basket(BasketSnapshot),
    Product(ProductItem),
    FormErrors(FormErrors),
    FieldChange { field: OrderField, value: String },
    OrderForm(OrderForm),
    OrderResult(OrderResult),
}

impl ShopPayload {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Catalog { .. } => "catalog",
            Self::Basket(_) => "basket",
            Self::Product(_) => "product",
            Self::FormErrors(_) => "form_errors",
            Self::FieldChange { .. } => "field_change",
            Self::OrderForm(_) => "order_form",
            Self::OrderResult(_) => "order_result",
        }
    }

    pub fn as_catalog(&self) -> anyhow::Result<&[ProductItem]> {
        match self {
            Self::Catalog { catalog } => Ok(catalog),
            other => anyhow::bail!("expected catalog payload, got {}", other.kind()),
        }
    }

    pub fn as_basket(&self) -> anyhow::Result<&BasketSnapshot> {
        match self {
            Self::Basket(snapshot) => Ok(snapshot),
            other => anyhow::bail!("expected basket payload, got {}", other.kind()),
        }
    }

    pub fn as_product(&self) -> anyhow::Result<&ProductItem> {
        match self {
            Self::Product(item) => Ok(item),
            other => anyhow::bail!("expected product payload, got {}", other.kind()),
        }
    }

    pub fn as_form_errors(&self) -> anyhow::Result<&FormErrors> {
        match self {
            Self::FormErrors(errors) => Ok(errors),
            other => anyhow::bail!("expected form_errors payload, got {}", other.kind()),
        }
    }

    pub fn as_field_change(&self) -> anyhow::Result<(OrderField, &str)> {
        match self {
            Self::FieldChange { field, value } => Ok((*field, value.as_str())),
            other => anyhow::bail!("expected field_change payload, got {}", other.kind()),
        }
    }

    pub fn as_order_form(&self) -> anyhow::Result<&OrderForm> {
        match self {
            Self::OrderForm(form) => Ok(form),
            other => anyhow::bail!("expected order_form payload, got {}", other.kind()),
        }
    }

    pub fn as_order_result(&self) -> anyhow::Result<&OrderResult> {
        match self {
            Self::OrderResult(result) => Ok(result),
            other => anyhow::bail!("expected order_result payload, got {}", other.kind()),
        }
    }
}

impl From<ProductItem> for ShopPayload {
    fn from(value: ProductItem) -> Self {
        Self::Product(value)
    }
}

impl From<BasketSnapshot> for ShopPayload {
    fn from(value: BasketSnapshot) -> Self {
        Self::Basket(value)
    }
}

impl From<FormErrors> for ShopPayload {
    fn from(value: FormErrors) -> Self {
        Self::FormErrors(value)
    }
}
