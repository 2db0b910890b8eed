//! 响应式实体（ReactiveEntity）
//!
//! 以组合方式持有普通状态与通知能力（`Notifier`），而非继承事件发射器：
//! - `update` 只修改状态，从不发通知；
//! - `notify` 在写锁释放之后发出事件，订阅者回读实体时总能看到本次变更的最终状态；
//! - 省略载荷时发送当前状态的克隆快照，而非活引用。
//!
use crate::error::DomainResult;
use crate::eventing::EventBus;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// 从实体状态构造事件载荷
pub trait Snapshot<P> {
    fn snapshot(&self) -> P;
}

/// 注入到实体中的发射能力
pub struct Notifier<P> {
    bus: Arc<EventBus<P>>,
}

impl<P> Clone for Notifier<P> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<P> fmt::Debug for Notifier<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

impl<P: 'static> Notifier<P> {
    pub fn new(bus: Arc<EventBus<P>>) -> Self {
        Self { bus }
    }

    pub fn emit(&self, event_name: &str, payload: &P) -> DomainResult<()> {
        self.bus.emit(event_name, payload)
    }

    pub fn bus(&self) -> &Arc<EventBus<P>> {
        &self.bus
    }
}

/// 可变状态 `S` + 通知能力
pub struct ReactiveEntity<S, P> {
    state: RwLock<S>,
    notifier: Notifier<P>,
}

impl<S: fmt::Debug, P> fmt::Debug for ReactiveEntity<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ReactiveEntity")
            .field("state", &*state)
            .finish_non_exhaustive()
    }
}

impl<S, P: 'static> ReactiveEntity<S, P> {
    pub fn new(state: S, bus: Arc<EventBus<P>>) -> Self {
        Self {
            state: RwLock::new(state),
            notifier: Notifier::new(bus),
        }
    }

    /// 从部分数据构造：只拷贝状态中可识别的字段，未知字段被忽略，
    /// 缺失字段取默认值（状态类型需标注 `#[serde(default)]`）。
    pub fn from_partial(data: serde_json::Value, bus: Arc<EventBus<P>>) -> DomainResult<Self>
    where
        S: DeserializeOwned,
    {
        let state: S = serde_json::from_value(data)?;
        Ok(Self::new(state, bus))
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// 修改状态（静默）
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// 发出事件；`payload` 为 `None` 时发送当前状态快照
    pub fn notify(&self, event_name: impl AsRef<str>, payload: Option<P>) -> DomainResult<()>
    where
        S: Snapshot<P>,
    {
        let payload = match payload {
            Some(payload) => payload,
            None => self.read(|state| state.snapshot()),
        };
        self.notify_with(event_name, &payload)
    }

    pub fn notify_with(&self, event_name: impl AsRef<str>, payload: &P) -> DomainResult<()> {
        let event_name = event_name.as_ref();
        tracing::debug!(event = event_name, "entity notify");
        self.notifier.emit(event_name, payload)
    }

    pub fn notifier(&self) -> &Notifier<P> {
        &self.notifier
    }

    pub fn bus(&self) -> &Arc<EventBus<P>> {
        self.notifier.bus()
    }
}
