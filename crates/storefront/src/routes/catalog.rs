//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use harvest_home_core::{FarmId, Product};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::services::catalog::{BrowseFilter, CatalogStore, LoadStatus, SortKey};
use crate::state::AppState;

/// Browse page query string. Both parameters are optional.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl BrowseQuery {
    fn filter(&self) -> Result<BrowseFilter> {
        self.category
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| AppError::BadRequest("Unknown category".to_string()))
    }

    fn sort(&self) -> SortKey {
        self.sort
            .as_deref()
            .map(SortKey::parse_or_default)
            .unwrap_or_default()
    }
}

/// GET /api/catalog
pub async fn show(State(state): State<AppState>) -> Result<Json<CatalogStore>> {
    Ok(Json(state.catalog().await?))
}

/// POST /api/catalog/reload
pub async fn reload(State(state): State<AppState>) -> Result<Json<LoadStatus>> {
    Ok(Json(state.reload_catalog().await?))
}

/// GET /api/products
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.filter()?;
    Ok(Json(state.browse(filter, query.sort()).await?))
}

/// GET /api/farms/{id}/products
pub async fn farm_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.farm_products(FarmId::new(id)).await?))
}
