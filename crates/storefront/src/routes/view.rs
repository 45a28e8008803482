//! Navigation and toast route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::Result;
use crate::models::View;
use crate::services::navigation::Screen;
use crate::services::notifications::Toast;
use crate::state::AppState;

/// Navigation request. The view is decoded leniently: anything
/// unrecognized lands on the home screen.
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    #[serde(default)]
    pub view: serde_json::Value,
}

/// GET /api/view
pub async fn show(State(state): State<AppState>) -> Result<Json<Screen>> {
    Ok(Json(state.screen().await?))
}

/// POST /api/view
pub async fn navigate(
    State(state): State<AppState>,
    Json(form): Json<NavigateForm>,
) -> Result<Json<Screen>> {
    let view = View::from_json_lenient(form.view);
    Ok(Json(state.go(view).await?))
}

/// GET /api/toast
pub async fn toast(State(state): State<AppState>) -> Json<Option<Toast>> {
    Json(state.toast())
}

/// DELETE /api/toast
pub async fn dismiss_toast(State(state): State<AppState>) -> StatusCode {
    state.dismiss_toast();
    StatusCode::NO_CONTENT
}
