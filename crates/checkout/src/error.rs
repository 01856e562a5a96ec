//! Errors surfaced by shop operations.
//!
//! Every variant is terminal for the call that produced it; nothing is retried
//! internally and no partial result accompanies an error.

use thiserror::Error;

use storefront_core::{OrderId, ProductId};
use storefront_products::CatalogError;
use storefront_sales::{OrderError, OrderStoreError};

pub type ShopResult<T> = Result<T, ShopError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("cart not found: {0}")]
    CartNotFound(OrderId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("not enough stock for {product_id} (requested {requested}, available {available})")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("item not found in cart: {0}")]
    ItemNotFoundInCart(ProductId),

    #[error("order {0} is already checked out")]
    OrderClosed(OrderId),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("order {0} already exists")]
    DuplicateOrder(OrderId),

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

impl From<CatalogError> for ShopError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::UnknownProduct(id) => ShopError::ProductNotFound(id),
            CatalogError::InsufficientStock {
                product_id,
                requested,
                available,
            } => ShopError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            CatalogError::LockPoisoned => ShopError::LockPoisoned("catalog"),
        }
    }
}

impl From<OrderStoreError> for ShopError {
    fn from(value: OrderStoreError) -> Self {
        match value {
            OrderStoreError::NotFound(id) => ShopError::CartNotFound(id),
            OrderStoreError::AlreadyExists(id) => ShopError::DuplicateOrder(id),
            OrderStoreError::LockPoisoned => ShopError::LockPoisoned("order store"),
        }
    }
}

impl From<OrderError> for ShopError {
    fn from(value: OrderError) -> Self {
        match value {
            OrderError::Closed(id) => ShopError::OrderClosed(id),
            OrderError::InvalidQuantity | OrderError::QuantityOverflow(_) => {
                ShopError::InvalidQuantity
            }
            OrderError::ItemNotFound(id) => ShopError::ItemNotFoundInCart(id),
        }
    }
}
