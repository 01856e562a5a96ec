//! `storefront-core`: shared building blocks for the storefront domain.
//!
//! This crate contains **pure domain** primitives (no locking, no IO).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, OrderLineId, ProductId};
pub use money::Money;
