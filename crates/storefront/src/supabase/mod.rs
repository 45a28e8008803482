//! Hosted backend client (Supabase-compatible).
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`: GoTrue-style auth under `auth/v1/`,
//!   PostgREST-style tables under `rest/v1/`
//! - Every request carries the public anon key; signed-in calls add the
//!   user's bearer token
//! - Table reads are cached in-process via `moka` (5 minute TTL)
//!
//! The backend is the source of truth for identity and catalog data.
//! Nothing here persists locally beyond the cache.

mod auth;
mod cache;
mod rest;
pub mod types;

pub use auth::SupabaseAuth;
pub use rest::DataClient;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::SupabaseConfig;
use types::ApiErrorBody;

/// Errors from talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SupabaseError {
    /// Whether the backend rejected the request itself (as opposed to
    /// being unreachable or misbehaving).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Shared HTTP plumbing for the auth and data clients.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    oauth_redirect_url: Option<String>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a new client for the configured project.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(SupabaseClientInner {
                http: reqwest::Client::new(),
                base_url: normalize_base_url(&config.url),
                anon_key: config.anon_key.clone(),
                oauth_redirect_url: config.oauth_redirect_url.clone(),
            }),
        }
    }

    /// Resolve a path such as `rest/v1/farms` against the project URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        Ok(self.inner.base_url.join(path)?)
    }

    pub(crate) fn oauth_redirect_url(&self) -> Option<&str> {
        self.inner.oauth_redirect_url.as_deref()
    }

    /// Start a request with the project key and, when signed in, the
    /// user's access token. Anonymous calls authenticate as the anon key.
    pub(crate) fn request(
        &self,
        method: Method,
        url: Url,
        access_token: Option<&SecretString>,
    ) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.inner.anon_key);
        self.inner
            .http
            .request(method, url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .bearer_auth(bearer.expose_secret())
    }

    /// Send a request and parse a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SupabaseError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse backend response"
            );
            SupabaseError::Parse(e)
        })
    }

    /// Send a request whose body is irrelevant.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), SupabaseError> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body, 500),
                "Backend returned non-success status"
            );
            return Err(error_from_body(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Build an [`SupabaseError::Api`] from an error response body.
///
/// Auth and data endpoints disagree on where the human-readable message
/// lives; take the first one present and fall back to the raw body.
pub(crate) fn error_from_body(status: u16, body: &str) -> SupabaseError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                truncate(body, 200)
            }
        });
    SupabaseError::Api { status, message }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalize_base_url(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_auth_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let err = error_from_body(400, body);
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "API error (400): Invalid login credentials"
        );
    }

    #[test]
    fn test_error_from_signup_body() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        let err = error_from_body(422, body);
        assert!(matches!(err, SupabaseError::Api { message, .. } if message == "User already registered"));
    }

    #[test]
    fn test_error_from_rest_body() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.farms\" does not exist"}"#;
        let err = error_from_body(404, body);
        assert!(matches!(err, SupabaseError::Api { status: 404, message } if message.contains("farms")));
    }

    #[test]
    fn test_error_from_unstructured_body() {
        let err = error_from_body(502, "Bad Gateway");
        assert!(!err.is_client_error());
        assert!(matches!(err, SupabaseError::Api { message, .. } if message == "Bad Gateway"));

        let err = error_from_body(500, "");
        assert!(matches!(err, SupabaseError::Api { message, .. } if message == "HTTP 500"));
    }

    #[test]
    fn test_normalize_base_url() {
        let url = normalize_base_url(&Url::parse("https://abc.supabase.co").unwrap());
        assert_eq!(
            url.join("rest/v1/farms").unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/farms"
        );

        let url = normalize_base_url(&Url::parse("https://proxy.example.com/sb").unwrap());
        assert_eq!(
            url.join("auth/v1/user").unwrap().as_str(),
            "https://proxy.example.com/sb/auth/v1/user"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SupabaseError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
