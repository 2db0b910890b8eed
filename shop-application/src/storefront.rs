//! 店面展示器（Storefront）
//!
//! 持有事件总线、领域实体与无渲染视图，订阅全部店面事件并把用户动作翻译为事件：
//! - 视图只在事件回调中更新，回调以 `Weak` 引用展示器，不形成 `Arc` 环；
//! - 网络调用（目录加载、下单）在总线调用栈之外 `await`，完成后才发出事件；
//! - 调用失败由展示器记录日志，不会发出任何表示成功的事件。
//!
use crate::api::ShopApi;
use crate::config::ShopConfig;
use crate::error::{AppError, AppResult};
use crate::views::{
    BasketView, CardView, FormView, ModalContent, ModalView, PageView, total_label,
};
use shop_domain::domain_event::{
    FIELD_CHANGE_PATTERN, ShopBus, ShopEvent, ShopPayload, field_change_event,
};
use shop_domain::eventing::{EventBus, Matcher, SubscriptionHandle, Trigger};
use shop_domain::model::{AppState, Basket, Order, OrderResult, ProductItem};
use shop_domain::value_object::{CheckoutStep, OrderField};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 全部视图状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Views {
    pub page: PageView,
    pub basket: BasketView,
    pub order: FormView,
    pub contacts: FormView,
    pub modal: ModalView,
}

impl Default for Views {
    fn default() -> Self {
        Self {
            page: PageView::default(),
            basket: BasketView::default(),
            order: FormView::order(),
            contacts: FormView::contacts(),
            modal: ModalView::default(),
        }
    }
}

// 视图按钮绑定的发射器
struct Triggers {
    card_select: Trigger<ShopPayload>,
    basket_add: Trigger<ShopPayload>,
    basket_remove: Trigger<ShopPayload>,
    basket_open: Trigger<ShopPayload>,
    order_open: Trigger<ShopPayload>,
    order_submit: Trigger<ShopPayload>,
    contacts_submit: Trigger<ShopPayload>,
    modal_close: Trigger<ShopPayload>,
}

impl Triggers {
    fn new(bus: &Arc<ShopBus>) -> Self {
        Self {
            card_select: bus.trigger(ShopEvent::CardSelect.as_str()),
            basket_add: bus.trigger(ShopEvent::BasketAdd.as_str()),
            basket_remove: bus.trigger(ShopEvent::BasketRemove.as_str()),
            basket_open: bus.trigger(ShopEvent::BasketOpen.as_str()),
            order_open: bus.trigger(ShopEvent::OrderOpen.as_str()),
            order_submit: bus.trigger(ShopEvent::OrderSubmit.as_str()),
            contacts_submit: bus.trigger(ShopEvent::ContactsSubmit.as_str()),
            modal_close: bus.trigger(ShopEvent::ModalClose.as_str()),
        }
    }
}

pub struct Storefront {
    config: ShopConfig,
    bus: Arc<ShopBus>,
    app_state: AppState,
    basket: Basket,
    api: Arc<dyn ShopApi>,
    views: Mutex<Views>,
    pending: Mutex<Option<Order>>,
    triggers: Triggers,
    subscriptions: Mutex<Vec<SubscriptionHandle>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Storefront {
    pub fn new(config: ShopConfig, api: Arc<dyn ShopApi>) -> AppResult<Arc<Self>> {
        Self::with_bus(config, api, EventBus::shared())
    }

    /// 使用外部提供的总线（测试中可预先挂上观察者）
    pub fn with_bus(
        config: ShopConfig,
        api: Arc<dyn ShopApi>,
        bus: Arc<ShopBus>,
    ) -> AppResult<Arc<Self>> {
        let this = Arc::new(Self {
            app_state: AppState::new(bus.clone()),
            basket: Basket::new(bus.clone()),
            triggers: Triggers::new(&bus),
            config,
            bus,
            api,
            views: Mutex::new(Views::default()),
            pending: Mutex::new(None),
            subscriptions: Mutex::new(Vec::new()),
        });
        this.wire()?;
        Ok(this)
    }

    fn on<F>(self: &Arc<Self>, matcher: impl Into<Matcher>, f: F)
    where
        F: Fn(&Self, &ShopPayload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(self);
        let handle = self
            .bus
            .subscribe(matcher, move |payload: &ShopPayload| match weak.upgrade() {
                Some(this) => f(&this, payload),
                None => Ok(()),
            });
        lock(&self.subscriptions).push(handle);
    }

    fn wire(self: &Arc<Self>) -> AppResult<()> {
        if self.config.trace_events() {
            let handle = self.bus.observe_all(|name: &str, payload: &ShopPayload| {
                tracing::info!(event = name, kind = payload.kind(), "event");
                Ok(())
            });
            lock(&self.subscriptions).push(handle);
        }

        self.on(ShopEvent::ItemsChanged, |this, p| {
            let cards = p.as_catalog()?.iter().map(CardView::catalog).collect();
            this.views().page.catalog = cards;
            Ok(())
        });

        self.on(ShopEvent::BasketChanged, |this, p| {
            let snapshot = p.as_basket()?;
            let mut views = this.views();
            views.basket.render(snapshot);
            views.page.counter = snapshot.items.len();
            // 预览仍打开时同步按钮状态
            if let Some(ModalContent::Preview(card)) = views.modal.content.as_mut() {
                let in_basket = snapshot.items.iter().any(|it| it.id == card.id);
                let for_sale = this
                    .app_state
                    .product(&card.id)
                    .is_some_and(|it| it.is_for_sale());
                card.set_in_basket(for_sale, in_basket);
            }
            Ok(())
        });

        self.on(ShopEvent::CardSelect, |this, p| {
            this.app_state.set_preview(p.as_product()?.clone())?;
            Ok(())
        });

        self.on(ShopEvent::PreviewChanged, |this, p| {
            let item = p.as_product()?;
            let card = CardView::preview(item, this.basket.contains(&item.id));
            this.open_modal(ModalContent::Preview(card))
        });

        self.on(ShopEvent::BasketAdd, |this, p| {
            this.basket.add(p.as_product()?.clone())?;
            Ok(())
        });

        self.on(ShopEvent::BasketRemove, |this, p| {
            this.basket.remove(&p.as_product()?.id)?;
            Ok(())
        });

        self.on(ShopEvent::BasketOpen, |this, _| {
            this.open_modal(ModalContent::Basket)
        });

        self.on(ShopEvent::OrderOpen, |this, _| {
            let form = this.app_state.order();
            this.views().order.render(&form);
            this.open_modal(ModalContent::OrderForm)
        });

        self.on(ShopEvent::OrderSubmit, |this, _| {
            let form = this.app_state.order();
            this.views().contacts.render(&form);
            this.open_modal(ModalContent::Contacts)
        });

        self.on(ShopEvent::FormErrorsChanged, |this, p| {
            let errors = p.as_form_errors()?;
            let mut views = this.views();
            views.order.apply_errors(errors);
            views.contacts.apply_errors(errors);
            Ok(())
        });

        self.on(Matcher::pattern(FIELD_CHANGE_PATTERN)?, |this, p| {
            let (field, value) = p.as_field_change()?;
            this.app_state.set_order_field(field, value)?;
            Ok(())
        });

        self.on(ShopEvent::OrderReady, |_, p| {
            let form = p.as_order_form()?;
            tracing::debug!(payment = %form.payment, "order form ready");
            Ok(())
        });

        self.on(ShopEvent::ContactsSubmit, |this, _| {
            let order = this.app_state.order_for(&this.basket)?;
            tracing::debug!(items = order.items.len(), total = order.total, "order pending");
            *lock(&this.pending) = Some(order);
            Ok(())
        });

        self.on(ShopEvent::OrderSuccess, |this, p| {
            let result = p.as_order_result()?;
            this.open_modal(ModalContent::Success {
                total_label: total_label(result.total),
            })
        });

        self.on(ShopEvent::ModalOpen, |this, _| {
            this.views().page.locked = true;
            Ok(())
        });

        self.on(ShopEvent::ModalClose, |this, _| {
            let mut views = this.views();
            views.page.locked = false;
            views.modal.content = None;
            Ok(())
        });

        Ok(())
    }

    fn views(&self) -> MutexGuard<'_, Views> {
        lock(&self.views)
    }

    // 视图锁在发出 modal:open 之前释放
    fn open_modal(&self, content: ModalContent) -> anyhow::Result<()> {
        self.views().modal.content = Some(content);
        self.bus
            .emit(ShopEvent::ModalOpen.as_str(), &ShopPayload::Empty)?;
        Ok(())
    }

    fn catalog_item(&self, id: &str) -> AppResult<ProductItem> {
        self.app_state
            .product(id)
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))
    }

    /// 加载目录；失败时只记录日志并返回错误，不发出 `items:changed`
    pub async fn load_catalog(&self) -> AppResult<usize> {
        match self.api.get_product_list().await {
            Ok(items) => {
                let count = items.len();
                self.app_state.set_catalog(items)?;
                Ok(count)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load catalog");
                Err(err)
            }
        }
    }

    pub fn select_card(&self, id: &str) -> AppResult<()> {
        let item = self.catalog_item(id)?;
        self.triggers
            .card_select
            .fire(&ShopPayload::Product(item))?;
        Ok(())
    }

    pub fn add_to_basket(&self, id: &str) -> AppResult<()> {
        let item = self.catalog_item(id)?;
        self.triggers.basket_add.fire(&ShopPayload::Product(item))?;
        Ok(())
    }

    pub fn remove_from_basket(&self, id: &str) -> AppResult<()> {
        let item = match self.basket.items().into_iter().find(|it| it.id == id) {
            Some(item) => item,
            None => self.catalog_item(id)?,
        };
        self.triggers
            .basket_remove
            .fire(&ShopPayload::Product(item))?;
        Ok(())
    }

    pub fn open_basket(&self) -> AppResult<()> {
        self.triggers.basket_open.fire(&ShopPayload::Empty)?;
        Ok(())
    }

    /// 打开配送表单；购物车为空时不可结算
    pub fn open_order(&self) -> AppResult<()> {
        if self.basket.is_empty() {
            return Err(AppError::Validation("basket is empty".into()));
        }
        self.triggers.order_open.fire(&ShopPayload::Empty)?;
        Ok(())
    }

    /// 表单输入：更新视图中的值并发出 `{form}.{field}:change`
    pub fn input(&self, form: &str, field: OrderField, value: &str) -> AppResult<()> {
        {
            let mut views = self.views();
            if views.order.name() == form {
                views.order.set_value(field, value);
            } else if views.contacts.name() == form {
                views.contacts.set_value(field, value);
            }
        }

        let payload = ShopPayload::FieldChange {
            field,
            value: value.to_string(),
        };
        self.bus.emit(&field_change_event(form, field), &payload)?;
        Ok(())
    }

    /// 提交配送步骤，打开联系方式表单
    ///
    /// 以实体重新校验为准，视图中的 `valid` 只用于展示。
    pub fn submit_order(&self) -> AppResult<()> {
        self.ensure_step(CheckoutStep::Delivery)?;
        self.triggers.order_submit.fire(&ShopPayload::Empty)?;
        Ok(())
    }

    /// 提交联系方式步骤：生成待提交订单，由 `checkout` 发送
    pub fn submit_contacts(&self) -> AppResult<()> {
        self.ensure_step(CheckoutStep::Contacts)?;
        self.triggers
            .contacts_submit
            .fire(&ShopPayload::Empty)?;
        Ok(())
    }

    fn ensure_step(&self, step: CheckoutStep) -> AppResult<()> {
        let valid = match step {
            CheckoutStep::Delivery => self.app_state.validate_delivery()?,
            CheckoutStep::Contacts => self.app_state.validate_order()?,
        };
        if valid {
            return Ok(());
        }
        let errors = self.app_state.form_errors().for_step(step).joined();
        Err(AppError::Validation(format!(
            "{} step is incomplete: {errors}",
            step.as_str()
        )))
    }

    /// 发送待提交订单
    ///
    /// 成功：清空购物车、重置表单并发出 `order:success`；
    /// 订单一经接受，后续通知即便有处理器失败也全部发出，最后返回首个错误。
    /// 失败：记录日志，订单保留以便重试，不发出任何事件。
    pub async fn checkout(&self) -> AppResult<OrderResult> {
        let pending = lock(&self.pending).take();
        let Some(order) = pending else {
            return Err(AppError::NoPendingOrder);
        };

        match self.api.order_products(&order).await {
            Ok(result) => {
                let cleared = self.basket.clear();
                self.app_state.reset_order();
                let announced = self.bus.emit(
                    ShopEvent::OrderSuccess.as_str(),
                    &ShopPayload::OrderResult(result.clone()),
                );
                cleared?;
                announced?;
                Ok(result)
            }
            Err(err) => {
                tracing::error!(error = %err, total = order.total, "order submission failed");
                *lock(&self.pending) = Some(order);
                Err(err)
            }
        }
    }

    pub fn close_modal(&self) -> AppResult<()> {
        self.triggers.modal_close.fire(&ShopPayload::Empty)?;
        Ok(())
    }

    /// 退订展示器注册的全部处理器
    pub fn shutdown(&self) {
        let handles = std::mem::take(&mut *lock(&self.subscriptions));
        for handle in &handles {
            self.bus.unsubscribe(handle);
        }
        tracing::debug!(count = handles.len(), "storefront detached");
    }

    pub fn has_pending_order(&self) -> bool {
        lock(&self.pending).is_some()
    }

    pub fn snapshot(&self) -> Views {
        self.views().clone()
    }

    pub fn page(&self) -> PageView {
        self.views().page.clone()
    }

    pub fn basket_view(&self) -> BasketView {
        self.views().basket.clone()
    }

    pub fn order_form(&self) -> FormView {
        self.views().order.clone()
    }

    pub fn contacts_form(&self) -> FormView {
        self.views().contacts.clone()
    }

    pub fn modal(&self) -> ModalView {
        self.views().modal.clone()
    }

    pub fn bus(&self) -> &Arc<ShopBus> {
        &self.bus
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }
}
