//! Promotions domain module.
//!
//! A promotion is a discount rule (`PromotionCondition`) with an optional
//! validity window. Rules are pure: they look at an order and return a
//! non-positive adjustment to its total.

pub mod condition;
pub mod promotion;

pub use condition::{
    BuyXGetFreeProduct, PercentageThresholdDiscount, PromotionCondition,
    QuantityThresholdDiscount,
};
pub use promotion::Promotion;
