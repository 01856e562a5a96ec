//! Shop service: cart management and checkout.
//!
//! ## Locking
//!
//! - The catalog has one reader/writer lock. Listing products and the stock
//!   check in `add_item_to_cart` share it; checkout holds it exclusively for
//!   the whole validate + decrement + discount pass.
//! - Every order has its own mutex, held across any read-modify-write of its
//!   lines and across checkout.
//! - Locks are always taken order first, catalog second.
//!
//! ## Checkout
//!
//! ```text
//! order (locked, must be open)
//!   ↓
//! 1. validate every line against the catalog (exists, enough stock)
//!   ↓
//! 2. decrement stock for every line (only if step 1 passed for all)
//!   ↓
//! 3. subtotal = Σ line.unit_price × line.quantity
//!   ↓
//! 4. total = subtotal + Σ active promotion discounts (configured order)
//!   ↓
//! 5. mark order checked out
//! ```
//!
//! A failure in step 1 leaves the catalog and the order exactly as they were.

use chrono::{DateTime, Utc};

use storefront_core::{Money, OrderId, ProductId};
use storefront_products::{Catalog, Product};
use storefront_promotions::Promotion;
use storefront_sales::{Order, OrderStore};

use crate::error::{ShopError, ShopResult};
use crate::receipt::{AppliedDiscount, Receipt};

#[derive(Debug)]
pub struct ShopService {
    catalog: Catalog,
    orders: OrderStore,
    promotions: Vec<Promotion>,
}

impl ShopService {
    /// Build a service over a seeded catalog and order store.
    ///
    /// Promotions are evaluated in the order given and are fixed for the
    /// lifetime of the service.
    pub fn new(catalog: Catalog, promotions: Vec<Promotion>, orders: OrderStore) -> Self {
        Self {
            catalog,
            orders,
            promotions,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Register a new, empty cart.
    pub fn create_cart(&self) -> ShopResult<Order> {
        let order = Order::new(OrderId::new());
        self.orders.insert(order.clone())?;
        tracing::debug!(order_id = %order.id_typed(), "cart created");
        Ok(order)
    }

    /// Snapshot of every catalog product, ordered by id.
    pub fn list_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.catalog.list()?)
    }

    pub fn get_order(&self, order_id: OrderId) -> ShopResult<Order> {
        Ok(self.orders.get(order_id)?)
    }

    /// Add `quantity` units of `product_id` to a cart.
    ///
    /// Stock is checked, not reserved: the merged cart quantity must not
    /// exceed what the catalog holds right now. The unit price is captured
    /// when the product first enters the cart.
    pub fn add_item_to_cart(
        &self,
        order_id: OrderId,
        product_id: &ProductId,
        quantity: u32,
    ) -> ShopResult<Order> {
        let result = self.orders.with_order(order_id, |order| -> ShopResult<Order> {
            order.ensure_modifiable()?;
            if quantity == 0 {
                return Err(ShopError::InvalidQuantity);
            }

            let catalog = self.catalog.read()?;
            let product = catalog
                .get(product_id)
                .ok_or_else(|| ShopError::ProductNotFound(product_id.clone()))?;

            let wanted = order.quantity_of(product_id).checked_add(quantity);
            match wanted {
                Some(wanted) if product.has_stock_for(wanted) => {}
                _ => {
                    return Err(ShopError::InsufficientStock {
                        product_id: product_id.clone(),
                        requested: wanted.unwrap_or(u32::MAX),
                        available: product.quantity(),
                    });
                }
            }

            order.add_line(product_id.clone(), quantity, product.unit_price())?;
            Ok(order.clone())
        });

        match &result {
            Ok(order) => tracing::debug!(
                order_id = %order_id,
                product_id = %product_id,
                quantity,
                in_cart = order.quantity_of(product_id),
                "item added to cart"
            ),
            Err(err) => tracing::warn!(
                order_id = %order_id,
                product_id = %product_id,
                quantity,
                "add to cart rejected: {err}"
            ),
        }
        result
    }

    /// Drop the line for `product_id` from a cart.
    pub fn remove_item_from_cart(
        &self,
        order_id: OrderId,
        product_id: &ProductId,
    ) -> ShopResult<Order> {
        let result = self.orders.with_order(order_id, |order| -> ShopResult<Order> {
            order.remove_line(product_id)?;
            Ok(order.clone())
        });

        if let Err(err) = &result {
            tracing::warn!(
                order_id = %order_id,
                product_id = %product_id,
                "remove from cart rejected: {err}"
            );
        }
        result
    }

    /// Check out a cart now, returning the amount to pay.
    pub fn checkout(&self, order_id: OrderId) -> ShopResult<Money> {
        self.checkout_at(order_id, Utc::now())
    }

    /// Check out a cart, evaluating promotion windows at `now`.
    pub fn checkout_at(&self, order_id: OrderId, now: DateTime<Utc>) -> ShopResult<Money> {
        Ok(self.checkout_receipt_at(order_id, now)?.total)
    }

    pub fn checkout_receipt(&self, order_id: OrderId) -> ShopResult<Receipt> {
        self.checkout_receipt_at(order_id, Utc::now())
    }

    /// Check out a cart and return the full breakdown.
    pub fn checkout_receipt_at(
        &self,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> ShopResult<Receipt> {
        let result = self.orders.with_order(order_id, |order| -> ShopResult<Receipt> {
            order.ensure_modifiable()?;

            let mut catalog = self.catalog.write()?;
            catalog.reserve(
                order
                    .lines()
                    .iter()
                    .map(|line| (&line.product_id, line.quantity)),
            )?;

            let subtotal = order.subtotal();
            let (total, discounts) = self.apply_promotions(order, subtotal, now);

            order.mark_checked_out()?;
            drop(catalog);

            Ok(Receipt {
                order_id,
                subtotal,
                discounts,
                total,
            })
        });

        match &result {
            Ok(receipt) => tracing::info!(
                order_id = %order_id,
                subtotal = %receipt.subtotal,
                discount = %receipt.discount_total(),
                total = %receipt.total,
                "checkout completed"
            ),
            Err(err) => tracing::warn!(order_id = %order_id, "checkout rejected: {err}"),
        }
        result
    }

    /// Fold every active promotion over the subtotal, in configured order.
    fn apply_promotions(
        &self,
        order: &Order,
        subtotal: Money,
        now: DateTime<Utc>,
    ) -> (Money, Vec<AppliedDiscount>) {
        let mut total = subtotal;
        let mut applied = Vec::new();

        for promotion in &self.promotions {
            let Some(amount) = promotion.discount_for(order, now) else {
                tracing::trace!(promotion = %promotion.label(), "promotion skipped");
                continue;
            };

            tracing::debug!(
                promotion = %promotion.label(),
                amount = %amount,
                "promotion evaluated"
            );

            total += amount;
            if !amount.is_zero() {
                applied.push(AppliedDiscount {
                    promotion: promotion.label(),
                    amount,
                });
            }
        }

        (total, applied)
    }
}
