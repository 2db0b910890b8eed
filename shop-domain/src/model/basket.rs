//! 购物车实体
//!
//! 以商品 id 去重；只接受可售（有价）商品。每次实际变更后发出
//! `basket:changed`，载荷为变更完成后的快照（商品列表 + 合计）。
//!
use super::product::ProductItem;
use crate::domain_event::{ShopBus, ShopEvent, ShopPayload};
use crate::entity::{ReactiveEntity, Snapshot};
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 购物车快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketSnapshot {
    pub items: Vec<ProductItem>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketState {
    items: Vec<ProductItem>,
}

impl BasketState {
    fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|it| it.id == id)
    }

    fn total(&self) -> u64 {
        self.items.iter().map(|it| it.price.value_or_zero()).sum()
    }
}

impl Snapshot<ShopPayload> for BasketState {
    fn snapshot(&self) -> ShopPayload {
        ShopPayload::Basket(BasketSnapshot {
            items: self.items.clone(),
            total: self.total(),
        })
    }
}

#[derive(Debug)]
pub struct Basket {
    entity: ReactiveEntity<BasketState, ShopPayload>,
}

impl Basket {
    pub fn new(bus: Arc<ShopBus>) -> Self {
        Self {
            entity: ReactiveEntity::new(BasketState::default(), bus),
        }
    }

    /// 加入商品
    ///
    /// - 已存在同 id 商品：不变更、不通知，返回 `Ok(false)`；
    /// - 无价商品：拒绝，返回 `InvalidCommand`，不通知。
    pub fn add(&self, item: ProductItem) -> DomainResult<bool> {
        if !item.is_for_sale() {
            return Err(DomainError::invalid_command(format!(
                "product {} is not for sale",
                item.id
            )));
        }

        let id = item.id.clone();
        let added = self.entity.update(|s| {
            if s.contains(&item.id) {
                false
            } else {
                s.items.push(item);
                true
            }
        });

        if added {
            tracing::debug!(product = %id, "basket item added");
            self.entity.notify(ShopEvent::BasketChanged, None)?;
        }
        Ok(added)
    }

    /// 按 id 移除；不存在时为空操作，不通知
    pub fn remove(&self, id: &str) -> DomainResult<bool> {
        let removed = self.entity.update(|s| {
            let before = s.items.len();
            s.items.retain(|it| it.id != id);
            before != s.items.len()
        });

        if removed {
            tracing::debug!(product = id, "basket item removed");
            self.entity.notify(ShopEvent::BasketChanged, None)?;
        }
        Ok(removed)
    }

    /// 清空，返回移除的商品数；原本为空时不通知
    pub fn clear(&self) -> DomainResult<usize> {
        let removed = self.entity.update(|s| std::mem::take(&mut s.items).len());
        if removed > 0 {
            self.entity.notify(ShopEvent::BasketChanged, None)?;
        }
        Ok(removed)
    }

    pub fn items(&self) -> Vec<ProductItem> {
        self.entity.read(|s| s.items.clone())
    }

    pub fn ids(&self) -> Vec<String> {
        self.entity
            .read(|s| s.items.iter().map(|it| it.id.clone()).collect())
    }

    pub fn total(&self) -> u64 {
        self.entity.read(BasketState::total)
    }

    pub fn len(&self) -> usize {
        self.entity.read(|s| s.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entity.read(|s| s.contains(id))
    }

    pub fn snapshot(&self) -> BasketSnapshot {
        self.entity.read(|s| BasketSnapshot {
            items: s.items.clone(),
            total: s.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::EventBus;
    use crate::value_object::Price;
    use std::sync::Mutex;

    fn item(id: &str, price: Option<u64>) -> ProductItem {
        ProductItem::builder()
            .id(id)
            .title(format!("item {id}"))
            .price(Price::from(price))
            .build()
    }

    fn recording_bus() -> (Arc<ShopBus>, Arc<Mutex<Vec<BasketSnapshot>>>) {
        let bus = EventBus::shared();
        let seen: Arc<Mutex<Vec<BasketSnapshot>>> = Default::default();
        {
            let seen = seen.clone();
            bus.subscribe(ShopEvent::BasketChanged, move |p: &ShopPayload| {
                seen.lock().unwrap().push(p.as_basket()?.clone());
                Ok(())
            });
        }
        (bus, seen)
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let (bus, seen) = recording_bus();
        let basket = Basket::new(bus);

        assert!(basket.add(item("a", Some(750))).unwrap());
        assert!(!basket.add(item("a", Some(750))).unwrap());

        assert_eq!(basket.len(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn priceless_item_is_rejected_without_notification() {
        let (bus, seen) = recording_bus();
        let basket = Basket::new(bus);

        let err = basket.add(item("free", None)).unwrap_err();

        assert!(matches!(err, DomainError::InvalidCommand { .. }));
        assert!(basket.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn snapshot_carries_items_and_total() {
        let (bus, seen) = recording_bus();
        let basket = Basket::new(bus);

        basket.add(item("a", Some(750))).unwrap();
        basket.add(item("b", Some(1450))).unwrap();

        let seen = seen.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.total, 2200);
        assert_eq!(last.items.len(), 2);
        assert_eq!(basket.ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn removing_absent_id_is_silent() {
        let (bus, seen) = recording_bus();
        let basket = Basket::new(bus);
        basket.add(item("a", Some(1))).unwrap();

        assert!(!basket.remove("missing").unwrap());
        assert!(basket.remove("a").unwrap());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], BasketSnapshot::default());
    }

    #[test]
    fn clear_notifies_only_when_non_empty() {
        let (bus, seen) = recording_bus();
        let basket = Basket::new(bus);

        assert_eq!(basket.clear().unwrap(), 0);
        assert!(seen.lock().unwrap().is_empty());

        basket.add(item("a", Some(10))).unwrap();
        basket.add(item("b", Some(20))).unwrap();
        assert_eq!(basket.clear().unwrap(), 2);

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(basket.total(), 0);
    }
}
