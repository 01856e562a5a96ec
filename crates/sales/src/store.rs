//! In-memory order store.
//!
//! The map itself sits behind an `RwLock` (lookups share it, inserts take it
//! exclusively). Each order has its own `Mutex`, held for the duration of any
//! read-modify-write on that order's lines.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use storefront_core::{Entity, OrderId};

use crate::order::Order;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderStoreError {
    #[error("cart not found: {0}")]
    NotFound(OrderId),

    #[error("order {0} already exists")]
    AlreadyExists(OrderId),

    #[error("order store lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<OrderId, Arc<Mutex<Order>>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new order. Ids are never reused.
    pub fn insert(&self, order: Order) -> Result<(), OrderStoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::LockPoisoned)?;

        let id = *order.id();
        if orders.contains_key(&id) {
            return Err(OrderStoreError::AlreadyExists(id));
        }
        orders.insert(id, Arc::new(Mutex::new(order)));
        Ok(())
    }

    /// Snapshot of an order.
    pub fn get(&self, id: OrderId) -> Result<Order, OrderStoreError> {
        self.with_order(id, |order| Ok::<_, OrderStoreError>(order.clone()))
    }

    pub fn len(&self) -> Result<usize, OrderStoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderStoreError::LockPoisoned)?;
        Ok(orders.len())
    }

    pub fn is_empty(&self) -> Result<bool, OrderStoreError> {
        Ok(self.len()? == 0)
    }

    /// Run `f` with exclusive access to one order.
    ///
    /// The map lock is released before `f` runs; only the order's own lock is
    /// held, so work on other orders proceeds in parallel.
    pub fn with_order<T, E>(
        &self,
        id: OrderId,
        f: impl FnOnce(&mut Order) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<OrderStoreError>,
    {
        let slot = {
            let orders = self
                .orders
                .read()
                .map_err(|_| OrderStoreError::LockPoisoned)?;
            orders
                .get(&id)
                .cloned()
                .ok_or(OrderStoreError::NotFound(id))?
        };

        let mut order = slot.lock().map_err(|_| OrderStoreError::LockPoisoned)?;
        f(&mut *order)
    }
}
