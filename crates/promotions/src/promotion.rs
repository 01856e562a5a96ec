use std::sync::Arc;

use chrono::{DateTime, Utc};

use storefront_core::{DomainError, DomainResult, Money};
use storefront_sales::Order;

use crate::condition::PromotionCondition;

/// A discount rule with an optional validity window.
///
/// Both bounds are inclusive; an unset bound is unbounded on that side. A
/// promotion without a condition is inert and is skipped at checkout.
#[derive(Debug, Clone, Default)]
pub struct Promotion {
    name: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    condition: Option<Arc<dyn PromotionCondition>>,
}

impl Promotion {
    /// Always-active promotion for `condition`.
    pub fn new(condition: impl PromotionCondition + 'static) -> Self {
        Self {
            condition: Some(Arc::new(condition)),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict the promotion to `[starts_at, ends_at]`.
    pub fn with_window(
        mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        if let (Some(start), Some(end)) = (starts_at, ends_at) {
            if start > end {
                return Err(DomainError::validation(format!(
                    "promotion window starts ({start}) after it ends ({end})"
                )));
            }
        }
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.ends_at
    }

    pub fn condition(&self) -> Option<&dyn PromotionCondition> {
        self.condition.as_deref()
    }

    /// Name if set, otherwise the condition's description.
    pub fn label(&self) -> String {
        match (&self.name, &self.condition) {
            (Some(name), _) => name.clone(),
            (None, Some(condition)) => condition.describe(),
            (None, None) => "unconditioned promotion".to_string(),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let started = self.starts_at.is_none_or(|start| start <= now);
        let not_ended = self.ends_at.is_none_or(|end| end >= now);
        started && not_ended
    }

    /// The adjustment this promotion contributes at `now`, or `None` when it
    /// is outside its window or has no condition.
    pub fn discount_for(&self, order: &Order, now: DateTime<Utc>) -> Option<Money> {
        if !self.is_active(now) {
            return None;
        }
        self.condition
            .as_ref()
            .map(|condition| condition.calculate_discount(order))
    }
}
