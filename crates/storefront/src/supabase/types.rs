//! Wire types for the hosted backend.
//!
//! Table rows arrive in `snake_case` and are converted into the core
//! catalog types here. Rows the storefront cannot represent are rejected
//! with a [`RowError`] so the caller can skip them.

use chrono::{DateTime, Duration, Utc};
use harvest_home_core::{Category, Farm, FarmId, Price, PriceError, Product, ProductId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{RemoteSession, Session, SessionTokens};

// =============================================================================
// Catalog rows
// =============================================================================

/// A row of the `farms` table.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmRow {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl From<FarmRow> for Farm {
    fn from(row: FarmRow) -> Self {
        Self {
            id: FarmId::new(row.id),
            name: row.name,
            location: row.location,
            story: row.story.unwrap_or_default(),
            certifications: row.certifications.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            cover_image_url: row.cover_image_url.unwrap_or_default(),
        }
    }
}

/// A row of the `products` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub farm_id: i32,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// Why a table row could not become a catalog entry.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("unknown category: {0}")]
    Category(#[from] harvest_home_core::CategoryParseError),

    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
}

impl TryFrom<ProductRow> for Product {
    type Error = RowError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse()?;
        let price = Price::new(row.price)?;
        let stock = row
            .stock
            .map_or(0, |s| u32::try_from(s.max(0)).unwrap_or(u32::MAX));

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            price,
            unit: row.unit.unwrap_or_default(),
            farm_id: FarmId::new(row.farm_id),
            category,
            image_url: row.image_url.unwrap_or_default(),
            stock,
        })
    }
}

// =============================================================================
// Auth responses
// =============================================================================

/// The user object embedded in auth responses.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of the token endpoint (password and refresh grants).
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: UserResponse,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

impl TokenResponse {
    /// Turn the response into a session, stamping issue and expiry time
    /// relative to `now`.
    #[must_use]
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self.expires_in.map(|secs| now + Duration::seconds(secs));
        Session::Remote(RemoteSession {
            user_id: self.user.id,
            email: self.user.email.unwrap_or_default(),
            issued_at: now,
            tokens: SessionTokens {
                access_token: SecretString::from(self.access_token),
                refresh_token: SecretString::from(self.refresh_token),
                expires_at,
            },
        })
    }
}

/// Response of the sign-up endpoint.
///
/// With email confirmation disabled the backend signs the user straight
/// in; otherwise it returns only the new user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(TokenResponse),
    User(UserResponse),
}

/// Error body shapes used by the auth and data endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// The most descriptive message present.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_product_row_conversion() {
        let row: ProductRow = serde_json::from_str(
            r#"{"id":101,"name":"Heirloom Tomatoes","description":"Juicy","price":4.99,
                "unit":"lb","farm_id":1,"category":"Vegetable","image_url":"x","stock":50}"#,
        )
        .unwrap();
        let product = Product::try_from(row).unwrap();
        assert_eq!(product.id, ProductId::new(101));
        assert_eq!(product.price.amount(), Decimal::from_str("4.99").unwrap());
        assert_eq!(product.category, Category::Vegetable);
        assert_eq!(product.stock, 50);
    }

    #[test]
    fn test_product_row_rejects_unknown_category() {
        let row: ProductRow = serde_json::from_str(
            r#"{"id":1,"name":"Mystery","price":"1.00","farm_id":1,"category":"Meat"}"#,
        )
        .unwrap();
        assert!(matches!(Product::try_from(row), Err(RowError::Category(_))));
    }

    #[test]
    fn test_product_row_negative_stock_is_zero() {
        let row: ProductRow = serde_json::from_str(
            r#"{"id":1,"name":"Kale","price":"3.00","farm_id":1,"category":"vegetable","stock":-4}"#,
        )
        .unwrap();
        assert_eq!(Product::try_from(row).unwrap().stock, 0);
    }

    #[test]
    fn test_farm_row_missing_optionals() {
        let row: FarmRow =
            serde_json::from_str(r#"{"id":2,"name":"Sunny Meadow","location":"Vermont"}"#).unwrap();
        let farm = Farm::from(row);
        assert!(farm.certifications.is_empty());
        assert_eq!(farm.story, "");
    }

    #[test]
    fn test_signup_response_variants() {
        let confirm: SignUpResponse =
            serde_json::from_str(r#"{"id":"u1","email":"a@b.co","confirmation_sent_at":"x"}"#)
                .unwrap();
        assert!(matches!(confirm, SignUpResponse::User(_)));

        let signed_in: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"at","refresh_token":"rt","expires_in":3600,
                "user":{"id":"u1","email":"a@b.co"}}"#,
        )
        .unwrap();
        assert!(matches!(signed_in, SignUpResponse::Session(_)));
    }

    #[test]
    fn test_token_response_into_session() {
        let now = Utc::now();
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"at","refresh_token":"rt","expires_in":60,
                "user":{"id":"u1","email":"grower@example.com"}}"#,
        )
        .unwrap();
        let session = token.into_session(now);
        assert_eq!(session.email(), "grower@example.com");
        assert_eq!(
            session.tokens().unwrap().expires_at,
            Some(now + Duration::seconds(60))
        );
    }

    #[test]
    fn test_api_error_body_priority() {
        let body = ApiErrorBody {
            error: Some("invalid_grant".into()),
            error_description: Some("Invalid login credentials".into()),
            ..ApiErrorBody::default()
        };
        assert_eq!(body.into_message().unwrap(), "Invalid login credentials");
        assert!(ApiErrorBody::default().into_message().is_none());
    }
}
