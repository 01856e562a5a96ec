use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, Money, ProductId};

/// A sellable product and its available stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    unit_price: Money,
    quantity: u32,
}

impl Product {
    /// Create a product, validating its descriptive fields and price.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if unit_price.is_sign_negative() {
            return Err(DomainError::validation(format!(
                "unit_price must not be negative (product '{id}')"
            )));
        }

        Ok(Self {
            id,
            sku,
            name,
            unit_price,
            quantity,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Units currently available for sale.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn has_stock_for(&self, requested: u32) -> bool {
        self.quantity >= requested
    }

    /// Remove `amount` units from stock. Returns `false` (and leaves stock
    /// untouched) if that would go below zero.
    pub(crate) fn take_stock(&mut self, amount: u32) -> bool {
        match self.quantity.checked_sub(amount) {
            Some(remaining) => {
                self.quantity = remaining;
                true
            }
            None => false,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
