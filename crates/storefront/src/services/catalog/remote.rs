//! Catalog source backed by the hosted tables.

use async_trait::async_trait;
use harvest_home_core::{Farm, Product};
use tracing::instrument;

use super::images::{apply_farm_overrides, apply_product_images};
use super::{CatalogError, CatalogSource};
use crate::supabase::DataClient;

/// Reads farms and products from the backend and applies the image
/// substitutions.
#[derive(Clone)]
pub struct RemoteCatalog {
    data: DataClient,
}

impl RemoteCatalog {
    #[must_use]
    pub const fn new(data: DataClient) -> Self {
        Self { data }
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    #[instrument(skip(self))]
    async fn fetch_farms(&self) -> Result<Vec<Farm>, CatalogError> {
        let mut farms = self.data.farms().await?;
        apply_farm_overrides(&mut farms);
        Ok(farms)
    }

    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.data.products().await?;
        apply_product_images(&mut products);
        Ok(products)
    }
}
