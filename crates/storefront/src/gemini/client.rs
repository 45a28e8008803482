//! Gemini API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::services::recipes::ContentGenerator;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
///
/// Cheap to clone. Built without an API key it still constructs, but every
/// call fails with [`GeminiError::MissingApiKey`].
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, recipe generation will fail");
        }
        Self {
            inner: Arc::new(GeminiClientInner {
                client: reqwest::Client::new(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_API_BASE}/{}:generateContent", self.inner.model)
    }

    /// Ask for JSON conforming to `schema` and return the raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is configured, the request fails, or the
    /// response carries no text.
    #[instrument(skip(self, prompt, schema), fields(model = %self.inner.model))]
    pub async fn generate(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, GeminiError> {
        let api_key = self.inner.api_key.as_ref().ok_or(GeminiError::MissingApiKey)?;
        let request = GenerateContentRequest::json(prompt, schema);

        let response = self
            .inner
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            let body = response.text().await?;
            return Err(error_for_status(status, retry_after, &body));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, GeminiError> {
        self.generate(prompt, schema).await
    }
}

/// Extract the JSON text from a successful response body.
fn parse_response(body: &str) -> Result<String, GeminiError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;
    response.text().ok_or(GeminiError::EmptyResponse)
}

/// Map a non-success response to an error.
fn error_for_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> GeminiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return GeminiError::RateLimited(retry_after.unwrap_or(60));
    }

    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let message = parsed.map_or_else(|| "Invalid API key".to_string(), |e| e.error.message);
        return GeminiError::Unauthorized(message);
    }

    match parsed {
        Some(api_error) => GeminiError::Api {
            status: api_error.error.status,
            message: api_error.error.message,
        },
        None => GeminiError::Api {
            status: status.as_u16().to_string(),
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(&GeminiConfig {
            api_key: api_key.map(SecretString::from),
            model: "gemini-2.5-flash".to_string(),
        })
    }

    #[test]
    fn test_endpoint_uses_model() {
        assert_eq!(
            client(Some("k")).endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let err = client(None)
            .generate("anything", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::MissingApiKey));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"recipes\":[]}"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), r#"{"recipes":[]}"#);

        assert!(matches!(
            parse_response(r#"{"candidates":[]}"#),
            Err(GeminiError::EmptyResponse)
        ));
        assert!(matches!(parse_response("<html>"), Err(GeminiError::Parse(_))));
    }

    #[test]
    fn test_error_for_status() {
        let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, Some(7), "");
        assert!(matches!(err, GeminiError::RateLimited(7)));

        let body = r#"{"error":{"code":403,"message":"Permission denied","status":"PERMISSION_DENIED"}}"#;
        let err = error_for_status(StatusCode::FORBIDDEN, None, body);
        assert!(matches!(err, GeminiError::Unauthorized(m) if m == "Permission denied"));

        let body = r#"{"error":{"code":400,"message":"bad schema","status":"INVALID_ARGUMENT"}}"#;
        let err = error_for_status(StatusCode::BAD_REQUEST, None, body);
        assert!(matches!(err, GeminiError::Api { status, .. } if status == "INVALID_ARGUMENT"));

        let err = error_for_status(StatusCode::BAD_GATEWAY, None, "upstream");
        assert!(matches!(err, GeminiError::Api { status, message } if status == "502" && message == "upstream"));
    }
}
