//! Cart Store: the purchase basket for the active session.
//!
//! At most one line per product, in insertion order. Every mutator keeps
//! that invariant; callers never touch the line list directly. Item count
//! and subtotal are computed on demand.

use harvest_home_core::{Price, Product, ProductId};
use serde::Serialize;
use thiserror::Error;

/// Upper bound for a single line's quantity.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Manual quantity input that is not a whole number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quantity must be a whole number (got {0:?})")]
pub struct QuantityError(pub String);

/// Parse a quantity typed into the cart panel.
///
/// Surrounding whitespace is ignored. Zero and negative values parse
/// successfully; [`CartStore::set_quantity`] treats them as removal.
///
/// # Errors
///
/// Returns [`QuantityError`] for anything that is not an integer.
pub fn parse_quantity_input(input: &str) -> Result<i64, QuantityError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| QuantityError(input.to_string()))
}

/// One product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The basket plus whether its panel is showing.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    open: bool,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product`, merging into an existing line. Opens
    /// the panel. A zero quantity counts as one. Merged quantities are the
    /// plain sum; [`MAX_LINE_QUANTITY`] only bounds manual input.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity,
            });
        }
        self.open = true;
    }

    /// Replace a line's quantity. Zero or less removes the line; values
    /// above [`MAX_LINE_QUANTITY`] are clamped. Returns `false` when the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            let before = self.lines.len();
            self.lines.retain(|l| l.product.id != product_id);
            return self.lines.len() != before;
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity)
            .unwrap_or(MAX_LINE_QUANTITY)
            .min(MAX_LINE_QUANTITY);
        true
    }

    /// Remove every line and close the panel.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.open = false;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            item_count: self.item_count(),
            subtotal: self.subtotal(),
            open: self.open,
        }
    }
}

/// Read-only view of the cart for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub subtotal: Price,
    pub open: bool,
}
