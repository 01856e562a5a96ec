//! Monetary amounts.
//!
//! Amounts are exact decimals. The core never rounds; rounding to cents only
//! happens when an amount is presented.

use rust_decimal::prelude::*;

/// A currency amount (single implicit currency).
pub type Money = Decimal;

/// Number of decimal places used when presenting an amount.
pub const DISPLAY_PLACES: u32 = 2;

/// `unit_price × quantity`.
pub fn line_total(unit_price: Money, quantity: u32) -> Money {
    unit_price * Decimal::from(quantity)
}

/// `amount × percent / 100`.
pub fn percent_of(amount: Money, percent: Decimal) -> Money {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Round half away from zero to cents.
pub fn round_for_display(amount: Money) -> Money {
    amount.round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as a fixed two-decimal string, e.g. `"295.65"`.
pub fn format_amount(amount: Money) -> String {
    format!("{:.2}", round_for_display(amount))
}
