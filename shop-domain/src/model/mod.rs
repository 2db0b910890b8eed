//! 店面领域模型
//!
//! - `ProductItem`：目录商品；
//! - `Basket`：购物车实体（发出 `basket:changed`）；
//! - `AppState`：目录 + 结算会话实体（发出 `items:changed`、`preview:changed`、
//!   `formErrors:change`、`order:ready`）；
//! - `OrderForm`/`Order`/`OrderResult`：下单数据。
//!
mod app_state;
mod basket;
mod order;
mod product;

pub use app_state::{AppData, AppState};
pub use basket::{Basket, BasketSnapshot, BasketState};
pub use order::{Order, OrderForm, OrderResult};
pub use product::ProductItem;
