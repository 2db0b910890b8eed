//! 商店应用层（shop-application）
//!
//! 把外部协作方表达为接缝，并由 `Storefront` 把视图、事件总线与领域实体连接起来：
//! - `api`：`ShopApi` 异步接口与列表响应；`inmemory_api` 为内存实现；
//! - `views`：无渲染的视图状态（页面、卡片、购物车、表单、弹窗）；
//! - `storefront`：订阅全部店面事件并提供用户动作；
//! - `config` / `logging` / `error`：配置、日志初始化与应用错误。
//!
pub mod api;
pub mod config;
pub mod error;
pub mod inmemory_api;
pub mod logging;
pub mod storefront;
pub mod views;

pub use config::ShopConfig;
pub use inmemory_api::InMemoryShopApi;
pub use storefront::Storefront;
