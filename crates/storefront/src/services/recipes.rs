//! Recipe Advisor: recipe suggestions from the generative endpoint.
//!
//! Stateless. Each call sends one prompt with a JSON schema, parses the
//! answer, and (for inventory recipes) prices matched ingredients against
//! the catalog snapshot it was given.

use std::sync::Arc;

use async_trait::async_trait;
use harvest_home_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, instrument};

use crate::gemini::GeminiError;

const IDEAS_FAILED: &str = "Failed to get recipe ideas. Please check your API key and try again.";
const ASSISTANT_FAILED: &str = "Something went wrong. Please try again.";

/// The structured-generation call the advisor depends on.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text that parses as JSON conforming to `schema`.
    async fn generate_json(&self, prompt: &str, schema: Value) -> Result<String, GeminiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// The request could not be completed. Carries the message to show.
    #[error("{0}")]
    RequestFailed(&'static str),

    /// The request worked but produced nothing.
    #[error("I couldn't find any recipes matching that request using our inventory. Try something else!")]
    NoResults,

    /// Blank request text.
    #[error("Tell us what you'd like to cook.")]
    EmptyRequest,
}

/// A recipe suggested for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIdea {
    pub recipe_name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Deserialize)]
struct IdeasResponse {
    recipes: Vec<RecipeIdea>,
}

/// One ingredient as returned by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantIngredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub matched_product_id: Option<i32>,
    #[serde(default)]
    pub quantity_to_buy: Option<i64>,
}

/// A recipe built from store inventory, as returned by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<AssistantIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Deserialize)]
struct AssistantResponse {
    recipes: Vec<AssistantRecipe>,
}

/// What buying one ingredient costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub quantity: u32,
    pub cost: Price,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedIngredient {
    pub name: String,
    pub amount: String,
    /// The catalog product supplying this ingredient.
    pub product: Option<Product>,
    /// Present only when a product matched and a quantity was given.
    pub purchase: Option<Purchase>,
}

impl PricedIngredient {
    #[must_use]
    pub const fn available(&self) -> bool {
        self.product.is_some()
    }
}

/// An assistant recipe reconciled against the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedRecipe {
    pub recipe: AssistantRecipe,
    pub ingredients: Vec<PricedIngredient>,
    pub total_cost: Price,
    pub can_add_all: bool,
}

impl PricedRecipe {
    /// Match each ingredient to a product. Unmatched ingredients, and
    /// matches without a positive quantity, add nothing to the cost.
    #[must_use]
    pub fn price(recipe: AssistantRecipe, products: &[Product]) -> Self {
        let ingredients: Vec<PricedIngredient> = recipe
            .ingredients
            .iter()
            .map(|ingredient| {
                let product = ingredient
                    .matched_product_id
                    .map(ProductId::new)
                    .and_then(|id| products.iter().find(|p| p.id == id));
                let quantity = ingredient
                    .quantity_to_buy
                    .filter(|q| *q > 0)
                    .map(|q| u32::try_from(q).unwrap_or(u32::MAX));
                let purchase = product.zip(quantity).map(|(product, quantity)| Purchase {
                    quantity,
                    cost: product.price.times(quantity),
                });
                PricedIngredient {
                    name: ingredient.name.clone(),
                    amount: ingredient.amount.clone(),
                    product: product.cloned(),
                    purchase,
                }
            })
            .collect();

        let total_cost = ingredients
            .iter()
            .filter_map(|i| i.purchase.as_ref().map(|p| p.cost))
            .sum();
        let can_add_all = ingredients.iter().any(|i| i.purchase.is_some());

        Self {
            recipe,
            ingredients,
            total_cost,
            can_add_all,
        }
    }

    /// Products and quantities for "add all to cart", in ingredient order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<(&Product, u32)> {
        self.ingredients
            .iter()
            .filter_map(|i| Some((i.product.as_ref()?, i.purchase.as_ref()?.quantity)))
            .collect()
    }
}

/// Asks the generative endpoint for recipes.
#[derive(Clone)]
pub struct RecipeAdvisor {
    generator: Arc<dyn ContentGenerator>,
}

impl std::fmt::Debug for RecipeAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeAdvisor").finish_non_exhaustive()
    }
}

impl RecipeAdvisor {
    #[must_use]
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// Three recipe ideas featuring `product_name`.
    ///
    /// # Errors
    ///
    /// Any transport, parse or schema failure is reported as
    /// [`RecipeError::RequestFailed`]. There are no partial results.
    #[instrument(skip(self))]
    pub async fn ideas_for(&self, product_name: &str) -> Result<Vec<RecipeIdea>, RecipeError> {
        let prompt = format!("Provide three simple and creative recipe ideas for {product_name}.");
        let text = self
            .generator
            .generate_json(&prompt, ideas_schema())
            .await
            .map_err(|e| {
                error!(error = %e, "Error generating recipe ideas");
                RecipeError::RequestFailed(IDEAS_FAILED)
            })?;

        let parsed: IdeasResponse = serde_json::from_str(text.trim()).map_err(|e| {
            error!(error = %e, "Invalid response format from recipe ideas call");
            RecipeError::RequestFailed(IDEAS_FAILED)
        })?;
        Ok(parsed.recipes)
    }

    /// Recipes answering `request`, built from `products` and priced.
    ///
    /// # Errors
    ///
    /// [`RecipeError::EmptyRequest`] for blank input,
    /// [`RecipeError::RequestFailed`] when the call or parse fails, and
    /// [`RecipeError::NoResults`] when the answer holds no recipes.
    #[instrument(skip(self, products), fields(inventory = products.len()))]
    pub async fn from_inventory(
        &self,
        request: &str,
        products: &[Product],
    ) -> Result<Vec<PricedRecipe>, RecipeError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(RecipeError::EmptyRequest);
        }

        let prompt = inventory_prompt(request, products);
        let text = self
            .generator
            .generate_json(&prompt, assistant_schema())
            .await
            .map_err(|e| {
                error!(error = %e, "Error generating inventory recipes");
                RecipeError::RequestFailed(ASSISTANT_FAILED)
            })?;

        let parsed: AssistantResponse = serde_json::from_str(text.trim()).map_err(|e| {
            error!(error = %e, "Invalid response format from recipe assistant");
            RecipeError::RequestFailed(ASSISTANT_FAILED)
        })?;

        if parsed.recipes.is_empty() {
            return Err(RecipeError::NoResults);
        }

        Ok(parsed
            .recipes
            .into_iter()
            .map(|recipe| PricedRecipe::price(recipe, products))
            .collect())
    }
}

fn inventory_prompt(request: &str, products: &[Product]) -> String {
    let inventory: Vec<Value> = products
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "price": p.price,
                "unit": p.unit,
            })
        })
        .collect();
    let inventory = Value::Array(inventory);

    format!(
        "You are the in-store chef at Harvest & Home, a farm-to-table grocery. \
         A customer asks: \"{request}\".\n\
         Suggest up to three recipes that answer the request, using ingredients from the \
         store inventory below wherever possible. For every ingredient the store carries, \
         set matchedProductId to the inventory id and quantityToBuy to how many units to buy. \
         Leave both out for ingredients the store does not carry. If nothing sensible can be \
         made, return an empty recipes list.\n\n\
         Inventory: {inventory}"
    )
}

fn ideas_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recipes": {
                "type": "ARRAY",
                "description": "A list of three recipe ideas.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "recipeName": { "type": "STRING", "description": "The name of the recipe." },
                        "description": { "type": "STRING", "description": "A short, enticing description of the dish." },
                        "ingredients": {
                            "type": "ARRAY",
                            "description": "A list of key ingredients.",
                            "items": { "type": "STRING" }
                        },
                        "instructions": {
                            "type": "ARRAY",
                            "description": "Step-by-step instructions.",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["recipeName", "description", "ingredients", "instructions"]
                }
            }
        },
        "required": ["recipes"]
    })
}

fn assistant_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recipes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "instructions": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "ingredients": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "name": { "type": "STRING" },
                                    "amount": { "type": "STRING", "description": "Amount used in the recipe, e.g. 2 cups." },
                                    "matchedProductId": { "type": "INTEGER", "description": "Inventory id supplying this ingredient." },
                                    "quantityToBuy": { "type": "INTEGER", "description": "Units of the matched product to buy." }
                                },
                                "required": ["name", "amount"]
                            }
                        }
                    },
                    "required": ["name", "description", "instructions", "ingredients"]
                }
            }
        },
        "required": ["recipes"]
    })
}
