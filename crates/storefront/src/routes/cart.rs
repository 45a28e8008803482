//! Cart and checkout route handlers.

use axum::{Json, extract::State};
use harvest_home_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::services::cart::CartSnapshot;
use crate::services::checkout::CheckoutSummary;
use crate::services::navigation::Screen;
use crate::state::AppState;

const fn default_quantity() -> u32 {
    1
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Whatever the quantity field held, as typed or as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Quantity edit from the cart panel.
#[derive(Debug, Deserialize)]
pub struct SetQuantityForm {
    pub product_id: ProductId,
    pub quantity: QuantityInput,
}

/// GET /api/cart
pub async fn show(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.cart().await?))
}

/// POST /api/cart/add
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.add_to_cart(form.product_id, form.quantity).await?))
}

/// POST /api/cart/quantity
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Json(form): Json<SetQuantityForm>,
) -> Result<Json<CartSnapshot>> {
    let raw = form.quantity.into_text();
    Ok(Json(state.set_cart_quantity(form.product_id, &raw).await?))
}

/// POST /api/cart/clear
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.clear_cart().await?))
}

/// POST /api/cart/open
pub async fn open(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.open_cart().await?))
}

/// POST /api/cart/close
pub async fn close(State(state): State<AppState>) -> Result<Json<CartSnapshot>> {
    Ok(Json(state.close_cart().await?))
}

/// POST /api/cart/checkout
pub async fn proceed_to_checkout(State(state): State<AppState>) -> Result<Json<Screen>> {
    Ok(Json(state.proceed_to_checkout().await?))
}

/// GET /api/checkout
pub async fn checkout_summary(State(state): State<AppState>) -> Result<Json<CheckoutSummary>> {
    Ok(Json(state.checkout_summary().await?))
}

/// POST /api/checkout
///
/// Returns the summary of the order that was placed.
pub async fn place_order(State(state): State<AppState>) -> Result<Json<CheckoutSummary>> {
    Ok(Json(state.place_order().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_form_defaults_quantity() {
        let form: AddToCartForm = serde_json::from_str(r#"{"product_id": 101}"#).unwrap();
        assert_eq!(form.product_id, ProductId::new(101));
        assert_eq!(form.quantity, 1);
    }

    #[test]
    fn test_quantity_accepts_text_or_number() {
        let form: SetQuantityForm =
            serde_json::from_str(r#"{"product_id": 1, "quantity": "12"}"#).unwrap();
        assert_eq!(form.quantity.into_text(), "12");

        let form: SetQuantityForm =
            serde_json::from_str(r#"{"product_id": 1, "quantity": -3}"#).unwrap();
        assert_eq!(form.quantity.into_text(), "-3");

        let form: SetQuantityForm =
            serde_json::from_str(r#"{"product_id": 1, "quantity": "abc"}"#).unwrap();
        assert_eq!(form.quantity.into_text(), "abc");
    }
}
