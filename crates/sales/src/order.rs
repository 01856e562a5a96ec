use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::money::line_total;
use storefront_core::{Entity, Money, OrderId, OrderLineId, ProductId};

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    CheckedOut,
}

/// Order line: product, quantity, unit price captured when first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn total(&self) -> Money {
        line_total(self.unit_price, self.quantity)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order {0} is already checked out")]
    Closed(OrderId),

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("item not found in cart: {0}")]
    ItemNotFound(ProductId),

    #[error("quantity overflow for {0}")]
    QuantityOverflow(ProductId),
}

/// A cart: an ordered list of lines, at most one per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Create an empty, open order.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            status: OrderStatus::Open,
            lines: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, OrderStatus::Open)
    }

    /// The line holding `product_id`, if any.
    pub fn line_for(&self, product_id: &ProductId) -> Option<&OrderLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Units of `product_id` currently in the cart.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }

    /// Sum of `quantity × unit_price` over all lines.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line for that product (keeping the price it
    /// was first captured at) or appends a new line priced at `unit_price`.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Result<&OrderLine, OrderError> {
        self.ensure_modifiable()?;
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        let idx = match self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)
        {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| OrderError::QuantityOverflow(product_id.clone()))?;
                idx
            }
            None => {
                self.lines.push(OrderLine {
                    id: OrderLineId::new(),
                    product_id,
                    quantity,
                    unit_price,
                });
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[idx])
    }

    /// Remove the line for `product_id`, preserving the order of the rest.
    pub fn remove_line(&mut self, product_id: &ProductId) -> Result<OrderLine, OrderError> {
        self.ensure_modifiable()?;

        let idx = self
            .lines
            .iter()
            .position(|line| &line.product_id == product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.clone()))?;

        Ok(self.lines.remove(idx))
    }

    /// Close the order. Further mutation is rejected.
    pub fn mark_checked_out(&mut self) -> Result<(), OrderError> {
        self.ensure_modifiable()?;
        self.status = OrderStatus::CheckedOut;
        Ok(())
    }

    pub fn ensure_modifiable(&self) -> Result<(), OrderError> {
        if !self.is_modifiable() {
            return Err(OrderError::Closed(self.id));
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
