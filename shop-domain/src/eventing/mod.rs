//! 事件子系统（eventing）
//!
//! 提供进程内、同步的发布/订阅：
//! - `Matcher`：订阅键，精确事件名、正则模式或全部事件；
//! - `EventHandler`：消费事件的处理器（闭包经 `FnHandler` 适配）；
//! - `EventBus`：注册表与快照分发，失败隔离后向调用方返回首个错误；
//! - `Trigger`：绑定单一事件名的发射器，供视图回调使用。
//!
//! 总线不持有任何外部资源，也不引用实体；生命周期由调用方以 `Arc` 管理。
//!
pub mod bus;
pub mod handler;
pub mod matcher;

pub use bus::{EventBus, SubscriptionHandle, Trigger};
pub use handler::{EventHandler, FnHandler};
pub use matcher::Matcher;
