//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象：价格、支付方式、订单字段与表单错误。
//!
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use shop_macros::value_object;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 校验当前值
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 商品价格
///
/// `None` 表示无价（Priceless），此类商品不可购买。
///
/// ```
/// use shop_domain::value_object::Price;
///
/// assert_eq!(Price::new(750).to_string(), "750 synapses");
/// assert_eq!(Price::priceless().to_string(), "Priceless");
/// assert_eq!(Price::priceless().value_or_zero(), 0);
/// ```
#[value_object(ord = true)]
#[derive(Copy)]
#[serde(transparent)]
pub struct Price(Option<u64>);

impl Price {
    pub const fn new(amount: u64) -> Self {
        Self(Some(amount))
    }

    pub const fn priceless() -> Self {
        Self(None)
    }

    pub const fn amount(&self) -> Option<u64> {
        self.0
    }

    pub const fn is_for_sale(&self) -> bool {
        self.0.is_some()
    }

    /// 合计时无价按 0 计
    pub const fn value_or_zero(&self) -> u64 {
        match self.0 {
            Some(v) => v,
            None => 0,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v} synapses"),
            None => f.write_str("Priceless"),
        }
    }
}

impl From<Option<u64>> for Price {
    fn from(value: Option<u64>) -> Self {
        Self(value)
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// 支付方式
#[value_object(ord = true)]
#[derive(Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            other => Err(DomainError::invalid_value(format!(
                "Unsupported payment method: {other}"
            ))),
        }
    }
}

/// 结算分步：配送（支付方式 + 地址）与联系方式（邮箱 + 电话）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Delivery,
    Contacts,
}

impl CheckoutStep {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Contacts => "contacts",
        }
    }

    pub const fn fields(&self) -> &'static [OrderField] {
        match self {
            Self::Delivery => &[OrderField::Payment, OrderField::Address],
            Self::Contacts => &[OrderField::Email, OrderField::Phone],
        }
    }
}

/// 订单表单字段
#[value_object(default = false, ord = true)]
#[derive(Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    pub const ALL: [OrderField; 4] = [Self::Payment, Self::Address, Self::Email, Self::Phone];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Address => "address",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub const fn step(&self) -> CheckoutStep {
        match self {
            Self::Payment | Self::Address => CheckoutStep::Delivery,
            Self::Email | Self::Phone => CheckoutStep::Contacts,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| DomainError::invalid_value(format!("unknown order field: {s}")))
    }
}

/// 表单错误：字段 → 提示文本（按字段顺序）
#[value_object]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<OrderField, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: OrderField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// 只保留属于给定步骤的字段
    pub fn for_step(&self, step: CheckoutStep) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, _)| k.step() == step)
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        )
    }

    /// 以 `fresh` 替换给定步骤的条目，其他步骤的条目保持不变
    pub fn replace_step(&mut self, step: CheckoutStep, fresh: FormErrors) {
        self.0.retain(|k, _| k.step() != step);
        self.0
            .extend(fresh.0.into_iter().filter(|(k, _)| k.step() == step));
    }

    /// 视图展示用：按字段顺序以 "; " 连接
    pub fn joined(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join("; ")
    }
}
