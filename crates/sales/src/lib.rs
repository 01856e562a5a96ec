//! Orders (carts) domain module.
//!
//! An order collects lines until it is checked out. The `OrderStore` keeps
//! every order behind its own lock so concurrent callers can work on
//! different carts without contending.

pub mod order;
pub mod store;

pub use order::{Order, OrderError, OrderLine, OrderStatus};
pub use store::{OrderStore, OrderStoreError};
