//! 店面领域事件
//!
//! - `ShopEvent`：封闭的事件名集合，视图与实体只通过这些名称交互；
//! - 表单字段绑定发出动态名称 `"{form}.{field}:change"`，以 `FIELD_CHANGE_PATTERN` 统一订阅；
//! - `ShopPayload`：事件载荷（`payload` 模块）。
//!
mod payload;

pub use payload::ShopPayload;

use crate::eventing::EventBus;
use crate::value_object::OrderField;
use shop_macros::event_names;

/// 店面使用的事件总线
pub type ShopBus = EventBus<ShopPayload>;

/// 店面事件名
#[event_names]
pub enum ShopEvent {
    /// 目录已更新
    #[event(name = "items:changed")]
    ItemsChanged,
    /// 购物车内容已变更
    #[event(name = "basket:changed")]
    BasketChanged,
    /// 预览商品已变更
    #[event(name = "preview:changed")]
    PreviewChanged,
    /// 表单校验结果
    #[event(name = "formErrors:change")]
    FormErrorsChanged,
    /// 订单表单两个步骤均已有效
    #[event(name = "order:ready")]
    OrderReady,
    #[event(name = "card:select")]
    CardSelect,
    #[event(name = "basket:open")]
    BasketOpen,
    #[event(name = "basket:add")]
    BasketAdd,
    #[event(name = "basket:remove")]
    BasketRemove,
    #[event(name = "order:open")]
    OrderOpen,
    /// 配送步骤提交
    #[event(name = "order:submit")]
    OrderSubmit,
    /// 联系方式步骤提交（触发下单）
    #[event(name = "contacts:submit")]
    ContactsSubmit,
    /// 下单成功
    #[event(name = "order:success")]
    OrderSuccess,
    #[event(name = "modal:open")]
    ModalOpen,
    #[event(name = "modal:close")]
    ModalClose,
}

/// 匹配所有表单字段变更事件，如 `order.address:change`
pub const FIELD_CHANGE_PATTERN: &str = r"^[\w-]+\.[\w-]+:change$";

/// 构造表单字段变更事件名
pub fn field_change_event(form: &str, field: OrderField) -> String {
    format!("{form}.{field}:change")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::Matcher;
    use std::str::FromStr;

    #[test]
    fn event_names_round_trip_through_from_str() {
        for ev in ShopEvent::ALL {
            assert_eq!(ShopEvent::from_str(ev.as_str()).unwrap(), *ev);
        }
        assert_eq!(ShopEvent::FormErrorsChanged.as_str(), "formErrors:change");
        assert!(ShopEvent::from_str("basket:exploded").is_err());
    }

    #[test]
    fn field_change_names_match_pattern() {
        let m = Matcher::pattern(FIELD_CHANGE_PATTERN).unwrap();
        assert!(m.matches(&field_change_event("order", OrderField::Address)));
        assert!(m.matches(&field_change_event("contacts", OrderField::Email)));
        assert_eq!(
            field_change_event("contacts", OrderField::Phone),
            "contacts.phone:change"
        );
        // 固定事件名不落入字段模式
        for ev in ShopEvent::ALL {
            assert!(!m.matches(ev.as_str()), "{ev} matched field pattern");
        }
    }
}
