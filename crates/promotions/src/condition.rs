//! Discount rules.
//!
//! Every rule implements [`PromotionCondition`]: given an order, return an
//! amount `<= 0` to add to the order total. Zero means the rule did not
//! trigger. Rules never fail; a missing line simply yields zero.

use core::fmt;

use storefront_core::money::{line_total, percent_of};
use storefront_core::{DomainError, DomainResult, Money, ProductId};
use storefront_sales::{Order, OrderLine};

/// Capability shared by all discount rules.
pub trait PromotionCondition: Send + Sync + fmt::Debug {
    /// Signed adjustment (`<= 0`) for `order`.
    fn calculate_discount(&self, order: &Order) -> Money;

    /// Short label for receipts and logs.
    fn describe(&self) -> String;
}

fn first_line<'a>(order: &'a Order, product_id: &ProductId) -> Option<&'a OrderLine> {
    order.lines().iter().find(|line| &line.product_id == product_id)
}

/// Each unit of `x_product_id` makes one already-purchased unit of
/// `free_product_id` free.
///
/// The rule never adds a free unit to the cart: if the free product was not
/// bought, nothing is discounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyXGetFreeProduct {
    pub x_product_id: ProductId,
    pub free_product_id: ProductId,
}

impl BuyXGetFreeProduct {
    pub fn new(x_product_id: ProductId, free_product_id: ProductId) -> Self {
        Self {
            x_product_id,
            free_product_id,
        }
    }
}

impl PromotionCondition for BuyXGetFreeProduct {
    fn calculate_discount(&self, order: &Order) -> Money {
        let mut qualifying = 0u32;
        let mut free_line = None;

        for line in order.lines() {
            if line.product_id == self.x_product_id {
                qualifying = qualifying.saturating_add(line.quantity);
            }
            if line.product_id == self.free_product_id {
                free_line = Some(line);
            }
        }

        match free_line {
            Some(line) => as_discount(line_total(line.unit_price, qualifying.min(line.quantity))),
            None => Money::ZERO,
        }
    }

    fn describe(&self) -> String {
        format!(
            "free {} with every {}",
            self.free_product_id, self.x_product_id
        )
    }
}

/// Buy `required_quantity`, get `discounted_quantity` of them free; repeats
/// for every full multiple of `required_quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityThresholdDiscount {
    pub product_id: ProductId,
    pub required_quantity: u32,
    pub discounted_quantity: u32,
}

impl QuantityThresholdDiscount {
    pub fn new(
        product_id: ProductId,
        required_quantity: u32,
        discounted_quantity: u32,
    ) -> DomainResult<Self> {
        if required_quantity == 0 {
            return Err(DomainError::validation(
                "required_quantity must be positive",
            ));
        }
        Ok(Self {
            product_id,
            required_quantity,
            discounted_quantity,
        })
    }
}

impl PromotionCondition for QuantityThresholdDiscount {
    fn calculate_discount(&self, order: &Order) -> Money {
        // Assumes one line per product (the cart merges adds).
        let Some(line) = first_line(order, &self.product_id) else {
            return Money::ZERO;
        };
        if self.required_quantity == 0 {
            return Money::ZERO;
        }

        let multiplier = line.quantity / self.required_quantity;
        let free_units = multiplier.saturating_mul(self.discounted_quantity);
        as_discount(line_total(line.unit_price, free_units))
    }

    fn describe(&self) -> String {
        format!(
            "{} for the price of {} on {}",
            self.required_quantity,
            self.required_quantity.saturating_sub(self.discounted_quantity),
            self.product_id
        )
    }
}

/// `percent`% off the whole line once its quantity reaches `min_quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageThresholdDiscount {
    pub product_id: ProductId,
    pub min_quantity: u32,
    pub percent: Money,
}

impl PercentageThresholdDiscount {
    pub fn new(product_id: ProductId, min_quantity: u32, percent: Money) -> DomainResult<Self> {
        if percent.is_sign_negative() || percent > Money::ONE_HUNDRED {
            return Err(DomainError::validation(format!(
                "percent must be within 0..=100, got {percent}"
            )));
        }
        Ok(Self {
            product_id,
            min_quantity,
            percent,
        })
    }
}

impl PromotionCondition for PercentageThresholdDiscount {
    fn calculate_discount(&self, order: &Order) -> Money {
        order
            .lines()
            .iter()
            .find(|line| line.product_id == self.product_id && line.quantity >= self.min_quantity)
            .map(|line| as_discount(percent_of(line.total(), self.percent)))
            .unwrap_or(Money::ZERO)
    }

    fn describe(&self) -> String {
        format!(
            "{}% off {} from {} units",
            self.percent.normalize(),
            self.product_id,
            self.min_quantity
        )
    }
}

/// Negate a saved amount; nothing saved is a plain zero, never `-0`.
fn as_discount(saved: Money) -> Money {
    if saved.is_zero() {
        Money::ZERO
    } else {
        -saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use storefront_core::OrderId;
    use storefront_core::money::format_amount;

    fn price(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn pid(s: &str) -> ProductId {
        ProductId::from(s)
    }

    fn order_with(lines: &[(&str, u32, &str)]) -> Order {
        let mut order = Order::new(OrderId::new());
        for (id, qty, unit_price) in lines {
            order.add_line(pid(id), *qty, price(unit_price)).unwrap();
        }
        order
    }

    fn macbook_promo() -> BuyXGetFreeProduct {
        BuyXGetFreeProduct::new(pid("macbookpro"), pid("raspberrypi"))
    }

    #[test]
    fn buy_x_discounts_one_free_unit_per_qualifying_unit() {
        let order = order_with(&[("macbookpro", 1, "5399.99"), ("raspberrypi", 1, "30.00")]);
        assert_eq!(macbook_promo().calculate_discount(&order), price("-30.00"));
    }

    #[test]
    fn buy_x_is_capped_by_free_units_in_cart() {
        let order = order_with(&[("macbookpro", 3, "5399.99"), ("raspberrypi", 2, "30.00")]);
        assert_eq!(macbook_promo().calculate_discount(&order), price("-60.00"));
    }

    #[test]
    fn buy_x_is_capped_by_qualifying_units() {
        let order = order_with(&[("macbookpro", 1, "5399.99"), ("raspberrypi", 4, "30.00")]);
        assert_eq!(macbook_promo().calculate_discount(&order), price("-30.00"));
    }

    #[test]
    fn buy_x_without_free_product_in_cart_grants_nothing() {
        let order = order_with(&[("macbookpro", 2, "5399.99")]);
        assert_eq!(macbook_promo().calculate_discount(&order), Money::ZERO);
    }

    #[test]
    fn buy_x_without_qualifying_product_grants_nothing() {
        let order = order_with(&[("raspberrypi", 2, "30.00")]);
        assert_eq!(macbook_promo().calculate_discount(&order), Money::ZERO);
    }

    #[test]
    fn quantity_threshold_gives_free_units_per_multiple() {
        let promo = QuantityThresholdDiscount::new(pid("googlehome"), 3, 1).unwrap();

        let three = order_with(&[("googlehome", 3, "49.99")]);
        assert_eq!(promo.calculate_discount(&three), price("-49.99"));

        let seven = order_with(&[("googlehome", 7, "49.99")]);
        assert_eq!(promo.calculate_discount(&seven), price("-99.98"));

        let two = order_with(&[("googlehome", 2, "49.99")]);
        assert_eq!(promo.calculate_discount(&two), Money::ZERO);
    }

    #[test]
    fn quantity_threshold_rejects_zero_requirement() {
        let err = QuantityThresholdDiscount::new(pid("googlehome"), 0, 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Built directly, a zero requirement never triggers.
        let raw = QuantityThresholdDiscount {
            product_id: pid("googlehome"),
            required_quantity: 0,
            discounted_quantity: 1,
        };
        let order = order_with(&[("googlehome", 3, "49.99")]);
        assert_eq!(raw.calculate_discount(&order), Money::ZERO);
    }

    #[test]
    fn percentage_applies_to_whole_line_once_threshold_met() {
        let promo = PercentageThresholdDiscount::new(pid("alexaspeaker"), 3, price("10")).unwrap();

        let three = order_with(&[("alexaspeaker", 3, "109.50")]);
        assert_eq!(promo.calculate_discount(&three), price("-32.85"));

        let two = order_with(&[("alexaspeaker", 2, "109.50")]);
        assert_eq!(promo.calculate_discount(&two), Money::ZERO);
    }

    #[test]
    fn untriggered_rules_return_a_plain_zero() {
        let order = order_with(&[
            ("googlehome", 2, "49.99"),
            ("alexaspeaker", 3, "109.50"),
            ("raspberrypi", 1, "30.00"),
        ]);
        let discounts = [
            macbook_promo().calculate_discount(&order),
            QuantityThresholdDiscount::new(pid("googlehome"), 3, 1)
                .unwrap()
                .calculate_discount(&order),
            PercentageThresholdDiscount::new(pid("alexaspeaker"), 3, Money::ZERO)
                .unwrap()
                .calculate_discount(&order),
        ];

        for discount in discounts {
            assert!(!discount.is_sign_negative(), "got {discount}");
            assert_eq!(format_amount(discount), "0.00");
        }
    }

    #[test]
    fn percentage_outside_range_is_rejected() {
        assert!(PercentageThresholdDiscount::new(pid("a"), 1, price("100.01")).is_err());
        assert!(PercentageThresholdDiscount::new(pid("a"), 1, price("-1")).is_err());
        assert!(PercentageThresholdDiscount::new(pid("a"), 1, price("100")).is_ok());
    }

    #[test]
    fn descriptions_name_the_products() {
        assert_eq!(macbook_promo().describe(), "free raspberrypi with every macbookpro");
        let qty = QuantityThresholdDiscount::new(pid("googlehome"), 3, 1).unwrap();
        assert_eq!(qty.describe(), "3 for the price of 2 on googlehome");
        let pct = PercentageThresholdDiscount::new(pid("alexaspeaker"), 3, price("10.0")).unwrap();
        assert_eq!(pct.describe(), "10% off alexaspeaker from 3 units");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn cents(value: u32) -> Money {
            Money::new(i64::from(value), 2)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: buy-X discount = min(X units, free units) × free unit price.
            #[test]
            fn buy_x_discount_formula(
                x_qty in 0u32..20,
                free_qty in 0u32..20,
                free_price in 1u32..100_000
            ) {
                let mut order = Order::new(OrderId::new());
                if x_qty > 0 {
                    order.add_line(pid("x"), x_qty, cents(999)).unwrap();
                }
                if free_qty > 0 {
                    order.add_line(pid("free"), free_qty, cents(free_price)).unwrap();
                }

                let promo = BuyXGetFreeProduct::new(pid("x"), pid("free"));
                let expected = if free_qty == 0 {
                    Money::ZERO
                } else {
                    -cents(free_price) * Money::from(x_qty.min(free_qty))
                };
                prop_assert_eq!(promo.calculate_discount(&order), expected);
            }

            /// Property: quantity discount = floor(qty / required) × free × price.
            #[test]
            fn quantity_threshold_formula(
                qty in 1u32..100,
                required in 1u32..10,
                free in 0u32..5,
                unit in 1u32..100_000
            ) {
                let order = {
                    let mut o = Order::new(OrderId::new());
                    o.add_line(pid("p"), qty, cents(unit)).unwrap();
                    o
                };
                let promo = QuantityThresholdDiscount::new(pid("p"), required, free).unwrap();

                let expected = -cents(unit) * Money::from((qty / required) * free);
                prop_assert_eq!(promo.calculate_discount(&order), expected);
                if required > qty {
                    prop_assert_eq!(promo.calculate_discount(&order), Money::ZERO);
                }
            }

            /// Property: percentage discount covers the full line at or above the threshold.
            #[test]
            fn percentage_threshold_formula(
                qty in 1u32..50,
                min in 0u32..50,
                percent in 0u32..=100,
                unit in 1u32..100_000
            ) {
                let mut order = Order::new(OrderId::new());
                order.add_line(pid("p"), qty, cents(unit)).unwrap();
                let promo = PercentageThresholdDiscount::new(pid("p"), min, Money::from(percent)).unwrap();

                let discount = promo.calculate_discount(&order);
                if qty >= min {
                    let expected = -(cents(unit) * Money::from(qty) * Money::from(percent) / Money::ONE_HUNDRED);
                    prop_assert_eq!(discount, expected);
                } else {
                    prop_assert_eq!(discount, Money::ZERO);
                }
                prop_assert!(discount <= Money::ZERO);
            }
        }
    }
}
