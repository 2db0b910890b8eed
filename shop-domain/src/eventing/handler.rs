//! 事件处理器（EventHandler）
//!
//! 定义消费事件的处理逻辑与元信息（名称用于失败报告与日志）。
//!
use std::fmt;

/// 事件处理器：以事件名与载荷被同步调用
pub trait EventHandler<P>: Send + Sync {
    /// 处理器名称（用于失败标记与日志）
    fn handler_name(&self) -> &str;
    /// 处理事件；返回错误不会中断同一次分发中其余处理器
    fn handle(&self, event_name: &str, payload: &P) -> anyhow::Result<()>;
}

/// 闭包处理器适配
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

impl<P, F> EventHandler<P> for FnHandler<F>
where
    F: Fn(&str, &P) -> anyhow::Result<()> + Send + Sync,
{
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event_name: &str, payload: &P) -> anyhow::Result<()> {
        (self.f)(event_name, payload)
    }
}
