//! Cart operations and the checkout engine.
//!
//! `ShopService` ties the catalog, the order store and the configured
//! promotions together. It is `Send + Sync`; share it behind an `Arc`.

pub mod error;
pub mod receipt;
pub mod service;

pub use error::{ShopError, ShopResult};
pub use receipt::{AppliedDiscount, Receipt};
pub use service::ShopService;
