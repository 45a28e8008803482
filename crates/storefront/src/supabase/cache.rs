//! Cache types for table reads.

use harvest_home_core::{Farm, Product};

/// Cache key for table reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Farms,
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Farms(Vec<Farm>),
    Products(Vec<Product>),
}
