//! 无渲染视图
//!
//! 只保存 DOM 会展示的状态（计数、滚动锁、卡片、价格文本、提交按钮可用性、
//! 错误文本、成功总额），便于在测试与命令行中观察店面。
//!
use shop_domain::model::{BasketSnapshot, OrderForm, ProductItem};
use shop_domain::value_object::{CheckoutStep, FormErrors, OrderField};
use std::collections::BTreeMap;

pub const BUTTON_ADD: &str = "Add to basket";
pub const BUTTON_IN_BASKET: &str = "In basket";
pub const BUTTON_NOT_FOR_SALE: &str = "Not for sale";

/// 商品类别对应的样式修饰符
pub fn category_tone(category: &str) -> &'static str {
    match category {
        "дополнительное" => "additional",
        "софт-скил" => "soft",
        "кнопка" => "button",
        "хард-скил" => "hard",
        _ => "other",
    }
}

pub fn total_label(total: u64) -> String {
    format!("{total} synapses")
}

/// 商品卡片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tone: &'static str,
    pub image: String,
    pub description: String,
    pub price_label: String,
    /// 购物车中的序号（从 1 开始）
    pub index: Option<usize>,
    /// 预览卡片上的按钮文本
    pub button: Option<&'static str>,
    pub button_enabled: bool,
}

impl CardView {
    pub fn catalog(item: &ProductItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            category: item.category.clone(),
            tone: category_tone(&item.category),
            image: item.image.clone(),
            description: item.description.clone(),
            price_label: item.price.to_string(),
            index: None,
            button: None,
            button_enabled: false,
        }
    }

    pub fn preview(item: &ProductItem, in_basket: bool) -> Self {
        let mut card = Self::catalog(item);
        card.set_in_basket(item.is_for_sale(), in_basket);
        card
    }

    pub fn basket(index: usize, item: &ProductItem) -> Self {
        Self {
            index: Some(index),
            ..Self::catalog(item)
        }
    }

    pub(crate) fn set_in_basket(&mut self, for_sale: bool, in_basket: bool) {
        let (label, enabled) = match (for_sale, in_basket) {
            (false, _) => (BUTTON_NOT_FOR_SALE, false),
            (true, true) => (BUTTON_IN_BASKET, false),
            (true, false) => (BUTTON_ADD, true),
        };
        self.button = Some(label);
        self.button_enabled = enabled;
    }
}

/// 页面：目录、购物车计数与滚动锁
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub catalog: Vec<CardView>,
    pub counter: usize,
    pub locked: bool,
}

/// 购物车视图
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketView {
    pub items: Vec<CardView>,
    pub total_label: String,
    pub checkout_enabled: bool,
}

impl BasketView {
    pub fn render(&mut self, snapshot: &BasketSnapshot) {
        self.items = snapshot
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| CardView::basket(i + 1, item))
            .collect();
        self.total_label = total_label(snapshot.total);
        self.checkout_enabled = !snapshot.items.is_empty();
    }
}

/// 结算表单（配送或联系方式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    name: &'static str,
    step: CheckoutStep,
    pub values: BTreeMap<OrderField, String>,
    pub valid: bool,
    pub errors: String,
}

impl FormView {
    pub fn order() -> Self {
        Self::new("order", CheckoutStep::Delivery)
    }

    pub fn contacts() -> Self {
        Self::new("contacts", CheckoutStep::Contacts)
    }

    fn new(name: &'static str, step: CheckoutStep) -> Self {
        Self {
            name,
            step,
            values: BTreeMap::new(),
            valid: false,
            errors: String::new(),
        }
    }

    /// 字段事件名中的表单前缀
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn owns(&self, field: OrderField) -> bool {
        field.step() == self.step
    }

    /// 打开表单：回填当前值，提交按钮禁用，清空错误
    pub fn render(&mut self, form: &OrderForm) {
        self.values = self
            .step
            .fields()
            .iter()
            .map(|f| (*f, form.get(*f)))
            .collect();
        self.valid = false;
        self.errors.clear();
    }

    pub fn set_value(&mut self, field: OrderField, value: &str) {
        if self.owns(field) {
            self.values.insert(field, value.to_string());
        }
    }

    pub fn apply_errors(&mut self, errors: &FormErrors) {
        let own = errors.for_step(self.step);
        self.valid = own.is_empty();
        self.errors = own.joined();
    }
}

/// 弹窗内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    Preview(CardView),
    Basket,
    OrderForm,
    Contacts,
    Success { total_label: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    pub content: Option<ModalContent>,
}

impl ModalView {
    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_domain::value_object::Price;

    fn item(price: Option<u64>) -> ProductItem {
        ProductItem::builder()
            .id("a")
            .title("A")
            .category("хард-скил")
            .price(Price::from(price))
            .build()
    }

    #[test]
    fn preview_button_reflects_basket_and_price() {
        assert_eq!(CardView::preview(&item(Some(1)), false).button, Some(BUTTON_ADD));
        let in_basket = CardView::preview(&item(Some(1)), true);
        assert_eq!(in_basket.button, Some(BUTTON_IN_BASKET));
        assert!(!in_basket.button_enabled);

        let priceless = CardView::preview(&item(None), false);
        assert_eq!(priceless.button, Some(BUTTON_NOT_FOR_SALE));
        assert_eq!(priceless.price_label, "Priceless");
        assert_eq!(priceless.tone, "hard");
    }

    #[test]
    fn form_view_only_shows_own_errors() {
        let mut errors = FormErrors::new();
        errors.insert(OrderField::Address, "Address is required");
        errors.insert(OrderField::Email, "Email is required");

        let mut order = FormView::order();
        order.apply_errors(&errors);
        assert!(!order.valid);
        assert_eq!(order.errors, "Address is required");

        let mut contacts = FormView::contacts();
        contacts.apply_errors(&FormErrors::new());
        assert!(contacts.valid);
        assert!(contacts.errors.is_empty());
    }

    #[test]
    fn basket_view_numbers_items_from_one() {
        let mut view = BasketView::default();
        view.render(&BasketSnapshot {
            items: vec![item(Some(100)), ProductItem { id: "b".into(), ..item(Some(50)) }],
            total: 150,
        });

        assert_eq!(view.items[1].index, Some(2));
        assert_eq!(view.total_label, "150 synapses");
        assert!(view.checkout_enabled);
    }
}
