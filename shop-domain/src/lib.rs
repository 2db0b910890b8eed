//! 商店领域层基础库（shop-domain）
//!
//! 提供店面（目录浏览、购物车、结算）所需的事件分发核心与响应式模型：
//! - 事件系统（`eventing`）：进程内发布/订阅总线，支持精确名称与模式匹配订阅、
//!   快照分发与失败隔离；
//! - 响应式实体（`entity`）：以组合方式注入通知能力的可变状态持有者；
//! - 领域事件（`domain_event`）：封闭的事件名集合与载荷；
//! - 值对象（`value_object`）与领域模型（`model`）：商品、购物车、结算会话。
//!
//! 本 crate 不涉及渲染与网络传输，视图、HTTP 客户端等外部协作方只通过
//! 事件名与载荷与核心交互。
//!
//! 典型用法：
//! 1. 显式创建一条 `EventBus` 并以 `Arc` 共享；
//! 2. 用同一总线构造 `Basket`、`AppState` 等实体；
//! 3. 视图订阅 `ShopEvent` 对应的事件，在回调中重新读取实体状态并渲染。
//!
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod model;
pub mod value_object;

// 允许在本 crate 内部通过 ::shop_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 中也能解析。
extern crate self as shop_domain;
