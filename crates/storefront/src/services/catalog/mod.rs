//! Catalog Store: the farm and product universe for a session.
//!
//! Loaded once from a [`CatalogSource`] (bundled seed data or the hosted
//! tables) and read-only afterwards. A failed fetch leaves that collection
//! empty and is recorded in [`LoadStatus`]; it never stops the rest of the
//! app from rendering.

mod browse;
mod images;
mod remote;
pub mod seed;

pub use browse::{BrowseFilter, SortKey, browse};
pub use remote::RemoteCatalog;
pub use seed::SeedCatalog;

use async_trait::async_trait;
use harvest_home_core::{Farm, FarmId, Product, ProductId};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::supabase::SupabaseError;

/// Number of products highlighted on the home screen.
pub const FEATURED_COUNT: usize = 4;

/// Errors from a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog backend error: {0}")]
    Backend(#[from] SupabaseError),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Where farms and products come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_farms(&self) -> Result<Vec<Farm>, CatalogError>;

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Outcome of the last load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStatus {
    pub loaded: bool,
    pub farms_failed: bool,
    pub products_failed: bool,
}

impl LoadStatus {
    /// Whether offering a reload makes sense.
    #[must_use]
    pub const fn any_failed(&self) -> bool {
        self.farms_failed || self.products_failed
    }
}

/// Ids that resolve to a catalog entry.
pub trait CatalogKey: Copy {
    type Entry;

    fn lookup(self, catalog: &CatalogStore) -> Option<&Self::Entry>;
}

impl CatalogKey for FarmId {
    type Entry = Farm;

    fn lookup(self, catalog: &CatalogStore) -> Option<&Farm> {
        catalog.farms.iter().find(|f| f.id == self)
    }
}

impl CatalogKey for ProductId {
    type Entry = Product;

    fn lookup(self, catalog: &CatalogStore) -> Option<&Product> {
        catalog.products.iter().find(|p| p.id == self)
    }
}

/// Farms and products in catalog order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStore {
    farms: Vec<Farm>,
    products: Vec<Product>,
    status: LoadStatus,
}

impl CatalogStore {
    /// Build a store directly from collections.
    #[must_use]
    pub fn from_parts(farms: Vec<Farm>, products: Vec<Product>) -> Self {
        Self {
            farms,
            products,
            status: LoadStatus {
                loaded: true,
                ..LoadStatus::default()
            },
        }
    }

    /// Fetch both collections concurrently. Each failure is logged and
    /// leaves its collection empty.
    pub async fn load(source: &dyn CatalogSource) -> Self {
        let (farms, products) = tokio::join!(source.fetch_farms(), source.fetch_products());

        let mut status = LoadStatus {
            loaded: true,
            ..LoadStatus::default()
        };

        let farms = farms.unwrap_or_else(|e| {
            error!(error = %e, "Error fetching farms");
            status.farms_failed = true;
            Vec::new()
        });
        let products = products.unwrap_or_else(|e| {
            error!(error = %e, "Error fetching products");
            status.products_failed = true;
            Vec::new()
        });

        info!(
            farms = farms.len(),
            products = products.len(),
            "Catalog loaded"
        );

        Self {
            farms,
            products,
            status,
        }
    }

    #[must_use]
    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Look up a farm or product by its id.
    #[must_use]
    pub fn by_id<K: CatalogKey>(&self, id: K) -> Option<&K::Entry> {
        id.lookup(self)
    }

    #[must_use]
    pub fn farm(&self, id: FarmId) -> Option<&Farm> {
        self.by_id(id)
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.by_id(id)
    }

    /// Products of one farm, lazily, in catalog order.
    pub fn products_of_farm(&self, farm_id: FarmId) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter().filter(move |p| p.farm_id == farm_id)
    }

    /// Products highlighted on the home screen.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        self.products.get(..FEATURED_COUNT).unwrap_or(&self.products)
    }

    #[must_use]
    pub fn browse(&self, filter: BrowseFilter, sort: SortKey) -> Vec<&Product> {
        browse(&self.products, filter, sort)
    }
}
