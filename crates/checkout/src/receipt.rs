use serde::Serialize;

use storefront_core::money::format_amount;
use storefront_core::{Money, OrderId};

/// A promotion that changed the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDiscount {
    pub promotion: String,
    pub amount: Money,
}

/// Outcome of a successful checkout.
///
/// `total == subtotal + Σ discounts[].amount`. The total is not clamped and
/// can go negative if overlapping promotions are misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub subtotal: Money,
    pub discounts: Vec<AppliedDiscount>,
    pub total: Money,
}

impl Receipt {
    pub fn discount_total(&self) -> Money {
        self.discounts.iter().map(|d| d.amount).sum()
    }
}

impl core::fmt::Display for Receipt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "order    {}", self.order_id)?;
        writeln!(f, "subtotal {:>12}", format_amount(self.subtotal))?;
        for discount in &self.discounts {
            writeln!(
                f,
                "  {:<40} {:>12}",
                discount.promotion,
                format_amount(discount.amount)
            )?;
        }
        write!(f, "total    {:>12}", format_amount(self.total))
    }
}
