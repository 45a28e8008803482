//! Farm and product records.
//!
//! Both are immutable once the catalog is loaded for a session. Field names
//! serialize in camelCase (`imageUrl`, `farmId`), the shape the storefront
//! UI consumes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::{FarmId, ProductId};
use super::price::Price;

/// A farm supplying products to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: FarmId,
    pub name: String,
    pub location: String,
    pub story: String,
    /// Display order is meaningful (most important first).
    pub certifications: Vec<String>,
    pub image_url: String,
    pub cover_image_url: String,
}

/// A product offered by one farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Display label for one unit, e.g. `"lb"` or `"dozen"`.
    pub unit: String,
    pub farm_id: FarmId,
    pub category: Category,
    pub image_url: String,
    /// Advisory only; purchases never decrement it.
    pub stock: u32,
}

/// Product categories shown as browse filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetable,
    Fruit,
    Dairy,
    Bakery,
    Artisanal,
}

impl Category {
    /// All categories in filter-bar order.
    pub const ALL: [Self; 5] = [
        Self::Vegetable,
        Self::Fruit,
        Self::Dairy,
        Self::Bakery,
        Self::Artisanal,
    ];

    /// The category name as stored and displayed.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetable => "Vegetable",
            Self::Fruit => "Fruit",
            Self::Dairy => "Dairy",
            Self::Bakery => "Bakery",
            Self::Artisanal => "Artisanal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}
