//! Products domain module.
//!
//! This crate owns the product catalog: product records plus the single
//! reader/writer lock that guards their stock counts.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogError, CatalogReadGuard, CatalogResult, CatalogWriteGuard};
pub use product::Product;
pub use storefront_core::ProductId;
