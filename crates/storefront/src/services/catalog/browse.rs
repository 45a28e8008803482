//! Browse-page filtering and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use harvest_home_core::{Category, Product};
use serde::{Deserialize, Deserializer};

/// Category filter for the browse page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseFilter {
    #[default]
    All,
    Only(Category),
}

impl BrowseFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

impl FromStr for BrowseFilter {
    type Err = harvest_home_core::CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for BrowseFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => fmt::Display::fmt(category, f),
        }
    }
}

/// Browse ordering. Unknown keys fall back to name ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Lenient parse used for query strings.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "name-desc" => Self::NameDesc,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::NameAsc,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::NameAsc => compare_names(a, b),
            Self::NameDesc => compare_names(b, a),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
        }
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_or_default(&s))
    }
}

fn compare_names(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Filter then stable-sort; ties keep catalog order.
#[must_use]
pub fn browse<'a>(products: &'a [Product], filter: BrowseFilter, sort: SortKey) -> Vec<&'a Product> {
    let mut result: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    result.sort_by(|a, b| sort.compare(a, b));
    result
}
