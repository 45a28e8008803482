//! Catalog table reads.

use std::time::Duration;

use harvest_home_core::{Farm, Product};
use moka::future::Cache;
use reqwest::Method;
use tracing::{debug, instrument, warn};

use super::cache::{CacheKey, CacheValue};
use super::types::{FarmRow, ProductRow};
use super::{SupabaseClient, SupabaseError};

const CACHE_TTL: Duration = Duration::from_secs(300);

/// Reads the `farms` and `products` tables.
///
/// Rows are converted into catalog types as they arrive; rows that do not
/// convert are logged and skipped. Results are cached for 5 minutes.
#[derive(Clone)]
pub struct DataClient {
    client: SupabaseClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl DataClient {
    #[must_use]
    pub fn new(client: SupabaseClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();
        Self { client, cache }
    }

    /// Fetch every farm, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn farms(&self) -> Result<Vec<Farm>, SupabaseError> {
        if let Some(CacheValue::Farms(farms)) = self.cache.get(&CacheKey::Farms).await {
            debug!("Cache hit for farms");
            return Ok(farms);
        }

        let rows: Vec<FarmRow> = self.select("farms").await?;
        let farms: Vec<Farm> = rows.into_iter().map(Farm::from).collect();

        self.cache
            .insert(CacheKey::Farms, CacheValue::Farms(farms.clone()))
            .await;
        Ok(farms)
    }

    /// Fetch every product, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a row list.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, SupabaseError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let rows: Vec<ProductRow> = self.select("products").await?;
        let products: Vec<Product> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                Product::try_from(row)
                    .inspect_err(|e| warn!(product_id = id, error = %e, "Skipping product row"))
                    .ok()
            })
            .collect();

        self.cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "id.asc");
        let request = self.client.request(Method::GET, url, None);
        self.client.send_json(request).await
    }
}
