//! 事件总线（EventBus）
//!
//! 进程内、同步的发布/订阅注册表：
//! - 精确事件名的订阅按名称存放（`DashMap`），模式与全量订阅存放于单独的有序列表；
//! - `emit` 在调用时刻截取匹配处理器的快照，再依次调用；
//! - 分发顺序：先精确名称订阅（按注册顺序），再模式/全量订阅（按注册顺序）；
//! - 分发期间新增的订阅收不到当前事件；分发期间被退订的处理器已在快照中，仍会收到当前事件；
//! - 某个处理器返回错误不会中断其余处理器，全部尝试后向调用方返回首个错误。
//!
//! 处理器 panic 不在上述隔离范围内：panic 会直接展开出 `emit`，快照中其后的处理器不再被调用。
//!
//! 注意：处理器内再次 `emit` 是允许的（注册表锁在调用处理器前已释放），
//! 但总线不做环路检测，处理器对自身事件名的重复发射可能形成无界的同步调用链。
//!
use super::handler::{EventHandler, FnHandler};
use super::matcher::Matcher;
use crate::error::{DomainError, DomainResult};
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type SharedHandler<P> = Arc<dyn EventHandler<P>>;

struct Registration<P> {
    id: Uuid,
    matcher: Matcher,
    handler: SharedHandler<P>,
}

impl<P> Clone for Registration<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            matcher: self.matcher.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Slot {
    Exact(String),
    Pattern,
}

/// 订阅句柄：精确标识一次注册，用于退订
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: Uuid,
    slot: Slot,
}

impl SubscriptionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// 进程内事件总线，`P` 为载荷类型
pub struct EventBus<P> {
    exact: DashMap<String, Vec<Registration<P>>>,
    patterns: RwLock<Vec<Registration<P>>>,
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self {
            exact: DashMap::new(),
            patterns: RwLock::new(Vec::new()),
        }
    }
}

impl<P> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("exact_names", &self.exact.len())
            .field("patterns", &self.read_patterns().len())
            .finish()
    }
}

impl<P: 'static> EventBus<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一条以 `Arc` 共享的总线
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// 以闭包订阅；同一匹配器可注册多个相互独立的处理器
    pub fn subscribe<F>(&self, matcher: impl Into<Matcher>, handler: F) -> SubscriptionHandle
    where
        F: Fn(&P) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let matcher = matcher.into();
        let name = format!("fn@{matcher}");
        self.register(
            matcher,
            Arc::new(FnHandler::new(name, move |_: &str, payload: &P| {
                handler(payload)
            })),
        )
    }

    /// 以正则模式订阅，非法模式立即返回错误
    pub fn subscribe_pattern<F>(&self, pattern: &str, handler: F) -> DomainResult<SubscriptionHandle>
    where
        F: Fn(&P) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let matcher = Matcher::pattern(pattern)?;
        Ok(self.subscribe(matcher, handler))
    }

    /// 以 `EventHandler` 实现订阅
    pub fn subscribe_handler(
        &self,
        matcher: impl Into<Matcher>,
        handler: Arc<dyn EventHandler<P>>,
    ) -> SubscriptionHandle {
        self.register(matcher.into(), handler)
    }

    /// 订阅全部事件，处理器同时收到事件名与载荷；仅用于诊断/追踪
    pub fn observe_all<F>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(&str, &P) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(Matcher::All, Arc::new(FnHandler::new("observe_all", handler)))
    }

    fn register(&self, matcher: Matcher, handler: SharedHandler<P>) -> SubscriptionHandle {
        let id = Uuid::new_v4();
        let slot = match &matcher {
            Matcher::Exact(name) => Slot::Exact(name.clone()),
            Matcher::Pattern(_) | Matcher::All => Slot::Pattern,
        };

        tracing::debug!(%id, %matcher, handler = handler.handler_name(), "subscribed");

        let registration = Registration {
            id,
            matcher,
            handler,
        };
        match &slot {
            Slot::Exact(name) => self
                .exact
                .entry(name.clone())
                .or_default()
                .push(registration),
            Slot::Pattern => self.write_patterns().push(registration),
        }

        SubscriptionHandle { id, slot }
    }

    /// 退订；未知或已退订的句柄为空操作，返回 `false`
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let removed = match &handle.slot {
            Slot::Exact(name) => {
                let removed = {
                    let Some(mut regs) = self.exact.get_mut(name) else {
                        return false;
                    };
                    let before = regs.len();
                    regs.retain(|r| r.id != handle.id);
                    before != regs.len()
                };
                self.exact.remove_if(name, |_, regs| regs.is_empty());
                removed
            }
            Slot::Pattern => {
                let mut patterns = self.write_patterns();
                let before = patterns.len();
                patterns.retain(|r| r.id != handle.id);
                before != patterns.len()
            }
        };

        if removed {
            tracing::debug!(id = %handle.id, "unsubscribed");
        }
        removed
    }

    /// 清空全部订阅，恢复到刚构造的状态
    pub fn unsubscribe_all(&self) {
        self.exact.clear();
        self.write_patterns().clear();
        tracing::debug!("all subscriptions cleared");
    }

    /// 同步分发事件
    ///
    /// - 无订阅者时为静默空操作；
    /// - 所有快照内的处理器都会被调用，之后若有失败，返回首个失败
    ///   （`suppressed` 为其余失败数）。
    pub fn emit(&self, event_name: &str, payload: &P) -> DomainResult<()> {
        let snapshot = self.snapshot(event_name);
        if snapshot.is_empty() {
            tracing::trace!(event = event_name, "no subscribers");
            return Ok(());
        }

        tracing::trace!(
            event = event_name,
            handlers = snapshot.len(),
            "dispatching event"
        );

        let mut first_failure: Option<(String, String)> = None;
        let mut suppressed = 0usize;

        for registration in &snapshot {
            let handler = &registration.handler;
            if let Err(err) = handler.handle(event_name, payload) {
                tracing::warn!(
                    event = event_name,
                    handler = handler.handler_name(),
                    error = %err,
                    "event handler failed"
                );
                if first_failure.is_none() {
                    first_failure = Some((handler.handler_name().to_string(), format!("{err:#}")));
                } else {
                    suppressed += 1;
                }
            }
        }

        match first_failure {
            None => Ok(()),
            Some((handler, reason)) => Err(DomainError::EventHandler {
                event: event_name.to_string(),
                handler,
                reason,
                suppressed,
            }),
        }
    }

    /// 当前是否存在能匹配该事件名的订阅
    pub fn has_subscribers(&self, event_name: &str) -> bool {
        self.exact
            .get(event_name)
            .is_some_and(|regs| !regs.is_empty())
            || self
                .read_patterns()
                .iter()
                .any(|r| r.matcher.matches(event_name))
    }

    /// 已注册的订阅总数
    pub fn subscription_count(&self) -> usize {
        let exact: usize = self.exact.iter().map(|e| e.value().len()).sum();
        exact + self.read_patterns().len()
    }

    /// 返回绑定到单一事件名的发射器
    pub fn trigger(self: &Arc<Self>, event_name: impl Into<String>) -> Trigger<P> {
        Trigger {
            bus: Arc::clone(self),
            event_name: event_name.into(),
        }
    }

    // 快照：先精确名称，再模式；取完即释放锁
    fn snapshot(&self, event_name: &str) -> Vec<Registration<P>> {
        let mut out: Vec<Registration<P>> = self
            .exact
            .get(event_name)
            .map(|regs| regs.clone())
            .unwrap_or_default();

        out.extend(
            self.read_patterns()
                .iter()
                .filter(|r| r.matcher.matches(event_name))
                .cloned(),
        );
        out
    }
}

impl<P> EventBus<P> {
    fn read_patterns(&self) -> RwLockReadGuard<'_, Vec<Registration<P>>> {
        self.patterns.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_patterns(&self) -> RwLockWriteGuard<'_, Vec<Registration<P>>> {
        self.patterns.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 绑定事件名的发射器（视图点击回调等场景）
pub struct Trigger<P> {
    bus: Arc<EventBus<P>>,
    event_name: String,
}

impl<P> Clone for Trigger<P> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
            event_name: self.event_name.clone(),
        }
    }
}

impl<P> fmt::Debug for Trigger<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("event_name", &self.event_name)
            .finish()
    }
}

impl<P: 'static> Trigger<P> {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn fire(&self, payload: &P) -> DomainResult<()> {
        self.bus.emit(&self.event_name, payload)
    }
}
