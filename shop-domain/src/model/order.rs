use crate::error::{DomainError, DomainResult};
use crate::value_object::{CheckoutStep, FormErrors, OrderField, PaymentMethod, ValueObject};
use serde::{Deserialize, Serialize};

/// 订单表单（两步：配送、联系方式）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl OrderForm {
    /// 按字段写入原始输入；支付方式无法识别时保持原值并返回错误
    pub fn set(&mut self, field: OrderField, value: &str) -> DomainResult<()> {
        match field {
            OrderField::Payment => self.payment = value.parse()?,
            OrderField::Address => self.address = value.to_string(),
            OrderField::Email => self.email = value.to_string(),
            OrderField::Phone => self.phone = value.to_string(),
        }
        Ok(())
    }

    pub fn get(&self, field: OrderField) -> String {
        match field {
            OrderField::Payment => self.payment.to_string(),
            OrderField::Address => self.address.clone(),
            OrderField::Email => self.email.clone(),
            OrderField::Phone => self.phone.clone(),
        }
    }

    /// 校验单个步骤，返回该步骤的错误（可能为空）
    pub fn validate_step(&self, step: CheckoutStep) -> FormErrors {
        let mut errors = FormErrors::new();
        for field in step.fields() {
            let missing = match field {
                OrderField::Payment => false,
                OrderField::Address => self.address.trim().is_empty(),
                OrderField::Email => self.email.trim().is_empty(),
                OrderField::Phone => self.phone.trim().is_empty(),
            };
            if missing {
                errors.insert(*field, required_message(*field));
            }
        }
        errors
    }
}

fn required_message(field: OrderField) -> &'static str {
    match field {
        OrderField::Payment => "Payment method is required",
        OrderField::Address => "Address is required",
        OrderField::Email => "Email is required",
        OrderField::Phone => "Phone is required",
    }
}

impl ValueObject for OrderForm {
    type Error = FormErrors;

    fn validate(&self) -> Result<(), Self::Error> {
        let mut errors = self.validate_step(CheckoutStep::Delivery);
        for (field, message) in self.validate_step(CheckoutStep::Contacts).iter() {
            errors.insert(field, message);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// 提交给 API 的订单：表单字段平铺，附商品 id 与合计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(flatten)]
    pub form: OrderForm,
    pub items: Vec<String>,
    pub total: u64,
}

impl Order {
    pub fn new(form: OrderForm, items: Vec<String>, total: u64) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::invalid_command("order has no items"));
        }
        form.validate().map_err(|errors| {
            DomainError::invalid_command(format!("order form is incomplete: {}", errors.joined()))
        })?;
        Ok(Self { form, items, total })
    }
}

/// 下单结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: String,
    pub total: u64,
}
