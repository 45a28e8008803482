//! Recipe advisor route handlers.

use axum::{Json, extract::State};
use harvest_home_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::services::cart::CartSnapshot;
use crate::services::recipes::{AssistantRecipe, PricedRecipe, RecipeIdea};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdeasForm {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
pub struct AssistantForm {
    pub request: String,
}

/// A recipe previously returned by the assistant.
#[derive(Debug, Deserialize)]
pub struct AddRecipeForm {
    pub recipe: AssistantRecipe,
}

/// POST /api/recipes/ideas
#[instrument(skip(state))]
pub async fn ideas(
    State(state): State<AppState>,
    Json(form): Json<IdeasForm>,
) -> Result<Json<Vec<RecipeIdea>>> {
    Ok(Json(state.recipe_ideas(form.product_id).await?))
}

/// POST /api/recipes/assistant
#[instrument(skip(state))]
pub async fn assistant(
    State(state): State<AppState>,
    Json(form): Json<AssistantForm>,
) -> Result<Json<Vec<PricedRecipe>>> {
    Ok(Json(state.assistant_recipes(&form.request).await?))
}

/// POST /api/recipes/assistant/add
///
/// The recipe is re-priced against the current catalog before anything is
/// added.
#[instrument(skip(state, form), fields(recipe = %form.recipe.name))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(form): Json<AddRecipeForm>,
) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.add_recipe_to_cart(form.recipe).await?))
}
