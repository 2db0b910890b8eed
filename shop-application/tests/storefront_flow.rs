use shop_application::error::AppError;
use shop_application::views::ModalContent;
use shop_application::{InMemoryShopApi, ShopConfig, Storefront};
use shop_domain::domain_event::{ShopBus, ShopPayload};
use shop_domain::eventing::EventBus;
use shop_domain::model::ProductItem;
use shop_domain::value_object::{OrderField, PaymentMethod, Price};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct EventLog {
    inner: Arc<Mutex<Vec<String>>>,
}
impl EventLog {
    fn attach(&self, bus: &ShopBus) {
        let inner = self.inner.clone();
        bus.observe_all(move |name: &str, _: &ShopPayload| {
            inner.lock().unwrap().push(name.to_string());
            Ok(())
        });
    }
    fn count(&self, name: &str) -> usize {
        self.inner.lock().unwrap().iter().filter(|n| *n == name).count()
    }
}

fn catalog() -> Vec<ProductItem> {
    vec![
        ProductItem::builder()
            .id("854cef69")
            .title("Frontend bot")
            .category("софт-скил")
            .image("/5_Dots.svg")
            .price(Price::new(750))
            .build(),
        ProductItem::builder()
            .id("c101ab44")
            .title("HEX lamp")
            .category("другое")
            .image("/Shell.svg")
            .price(Price::new(1450))
            .build(),
        ProductItem::builder()
            .id("b06cde61")
            .title("Mystery box")
            .category("дополнительное")
            .build(),
    ]
}

async fn setup() -> (Arc<Storefront>, Arc<InMemoryShopApi>, EventLog) {
    let config = ShopConfig::builder().api_origin("https://shop.test").build();
    let api = Arc::new(InMemoryShopApi::from_config(&config, catalog()));
    let bus: Arc<ShopBus> = EventBus::shared();
    let log = EventLog::default();
    log.attach(&bus);

    let sf = Storefront::with_bus(config, api.clone(), bus).unwrap();
    sf.load_catalog().await.unwrap();
    (sf, api, log)
}

fn fill_delivery(sf: &Storefront) {
    sf.open_order().unwrap();
    sf.input("order", OrderField::Payment, "cash").unwrap();
    sf.input("order", OrderField::Address, "Main st. 1").unwrap();
}

fn fill_contacts(sf: &Storefront) {
    sf.input("contacts", OrderField::Email, "buyer@shop.test").unwrap();
    sf.input("contacts", OrderField::Phone, "+7 900 000-00-00").unwrap();
}

#[tokio::test]
async fn full_checkout_flow() {
    let (sf, api, log) = setup().await;
    assert_eq!(log.count("items:changed"), 1);

    sf.select_card("854cef69").unwrap();
    sf.add_to_basket("854cef69").unwrap();
    sf.add_to_basket("c101ab44").unwrap();
    // 重复加入不产生通知
    sf.add_to_basket("c101ab44").unwrap();
    assert_eq!(log.count("basket:changed"), 2);

    sf.open_basket().unwrap();
    let basket = sf.basket_view();
    assert_eq!(basket.total_label, "2200 synapses");
    assert_eq!(basket.items[1].index, Some(2));
    assert!(matches!(sf.modal().content, Some(ModalContent::Basket)));

    fill_delivery(&sf);
    assert!(sf.order_form().valid);
    assert_eq!(sf.app_state().order().payment, PaymentMethod::Cash);

    sf.submit_order().unwrap();
    assert!(matches!(sf.modal().content, Some(ModalContent::Contacts)));
    assert!(!sf.contacts_form().valid);

    sf.input("contacts", OrderField::Email, "buyer@shop.test").unwrap();
    assert_eq!(sf.contacts_form().errors, "Phone is required");
    assert!(matches!(sf.submit_contacts(), Err(AppError::Validation(_))));

    sf.input("contacts", OrderField::Phone, "+7 900 000-00-00").unwrap();
    assert_eq!(log.count("order:ready"), 1);

    sf.submit_contacts().unwrap();
    assert!(sf.has_pending_order());

    let result = sf.checkout().await.unwrap();

    assert_eq!(result.total, 2200);
    assert_eq!(api.order_count(), 1);
    let stored = api.order(&result.id).unwrap();
    assert_eq!(stored.items, vec!["854cef69".to_string(), "c101ab44".to_string()]);
    assert_eq!(stored.form.address, "Main st. 1");

    assert_eq!(log.count("order:success"), 1);
    assert_eq!(sf.page().counter, 0);
    assert!(sf.basket().is_empty());
    assert_eq!(sf.app_state().order().address, "");
    match sf.modal().content {
        Some(ModalContent::Success { total_label }) => assert_eq!(total_label, "2200 synapses"),
        other => panic!("unexpected {other:?}"),
    }

    sf.close_modal().unwrap();
    assert!(!sf.page().locked);
}

#[tokio::test]
async fn network_failure_at_checkout_emits_no_success() {
    let (sf, api, log) = setup().await;
    sf.add_to_basket("854cef69").unwrap();
    fill_delivery(&sf);
    sf.submit_order().unwrap();
    fill_contacts(&sf);
    sf.submit_contacts().unwrap();

    api.set_offline(true);
    let err = sf.checkout().await.unwrap_err();

    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(log.count("order:success"), 0);
    assert_eq!(sf.basket().len(), 1);
    assert!(sf.has_pending_order());

    // 恢复网络后可重试
    api.set_offline(false);
    let result = sf.checkout().await.unwrap();
    assert_eq!(result.total, 750);
    assert_eq!(log.count("order:success"), 1);
}

#[tokio::test]
async fn checkout_without_submitted_contacts_is_rejected() {
    let (sf, _, _) = setup().await;

    assert!(matches!(sf.checkout().await, Err(AppError::NoPendingOrder)));
    assert!(matches!(sf.open_order(), Err(AppError::Validation(_))));
}

#[tokio::test]
async fn removing_from_basket_updates_views() {
    let (sf, _, log) = setup().await;
    sf.add_to_basket("854cef69").unwrap();
    sf.add_to_basket("c101ab44").unwrap();

    sf.remove_from_basket("854cef69").unwrap();
    // 不在购物车中的商品：静默
    sf.remove_from_basket("854cef69").unwrap();

    assert_eq!(log.count("basket:changed"), 3);
    let view = sf.basket_view();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].index, Some(1));
    assert_eq!(view.total_label, "1450 synapses");
    assert_eq!(sf.page().counter, 1);
}

#[tokio::test]
async fn unsupported_payment_disables_delivery_form() {
    let (sf, _, log) = setup().await;
    sf.add_to_basket("854cef69").unwrap();
    sf.open_order().unwrap();

    sf.input("order", OrderField::Address, "Main st. 1").unwrap();
    sf.input("order", OrderField::Payment, "barter").unwrap();

    let form = sf.order_form();
    assert!(!form.valid);
    assert_eq!(form.errors, "Unsupported payment method: barter");
    assert_eq!(sf.app_state().order().payment, PaymentMethod::Card);
    assert_eq!(log.count("formErrors:change"), 2);
    assert!(matches!(sf.submit_order(), Err(AppError::Validation(_))));
}

#[tokio::test]
async fn contacts_input_does_not_validate_empty_address() {
    let (sf, _, log) = setup().await;
    sf.add_to_basket("854cef69").unwrap();
    sf.open_order().unwrap();

    sf.input("order", OrderField::Address, "").unwrap();
    assert!(!sf.order_form().valid);

    sf.input("contacts", OrderField::Email, "buyer@shop.test").unwrap();

    let form = sf.order_form();
    assert!(!form.valid);
    assert_eq!(form.errors, "Address is required");
    assert!(matches!(sf.submit_order(), Err(AppError::Validation(_))));
    assert_eq!(log.count("order:submit"), 0);

    assert!(matches!(sf.submit_contacts(), Err(AppError::Validation(_))));
    assert_eq!(log.count("contacts:submit"), 0);
    assert!(!sf.has_pending_order());
}

#[tokio::test]
async fn accepted_order_is_announced_even_if_basket_listener_fails() {
    let (sf, api, log) = setup().await;
    sf.add_to_basket("854cef69").unwrap();
    fill_delivery(&sf);
    sf.submit_order().unwrap();
    fill_contacts(&sf);
    sf.submit_contacts().unwrap();

    sf.bus().subscribe("basket:changed", |p: &ShopPayload| {
        if p.as_basket()?.items.is_empty() {
            anyhow::bail!("badge renderer unavailable");
        }
        Ok(())
    });

    let err = sf.checkout().await.unwrap_err();

    assert!(matches!(err, AppError::Domain(_)));
    assert_eq!(api.order_count(), 1);
    assert_eq!(log.count("order:success"), 1);
    assert!(sf.basket().is_empty());
    assert!(!sf.has_pending_order());
    assert_eq!(sf.app_state().order().address, "");
    assert!(matches!(sf.modal().content, Some(ModalContent::Success { .. })));
}
