//! Order summary shown on the checkout screen.
//!
//! Placing an order is a stub: nothing is persisted and stock is not
//! decremented.

use harvest_home_core::Price;
use serde::Serialize;

use super::cart::{CartLine, CartStore};

/// Flat shipping charge per order, in cents.
pub const SHIPPING_CENTS: u32 = 500;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Price,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CheckoutSummary {
    #[must_use]
    pub fn of(cart: &CartStore) -> Self {
        let subtotal = cart.subtotal();
        let shipping = Price::from_cents(SHIPPING_CENTS);
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| SummaryLine {
                    line_total: line.line_total(),
                    line: line.clone(),
                })
                .collect(),
            item_count: cart.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
