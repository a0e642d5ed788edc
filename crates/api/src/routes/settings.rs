//! Application settings routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use quotedesk_db::repositories::{SettingsError, SettingsRepository};
use quotedesk_shared::AppError;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{app_error, error_response, internal_error};
use crate::{AppState, extract::ApiJson, middleware::AuthUser};

/// Creates the settings routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(list_settings).patch(update_setting))
}

/// Request body for updating a setting.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    /// Setting key.
    #[serde(default)]
    pub key: String,
    /// New value; numbers and booleans are stored in their text form.
    #[serde(default)]
    pub value: Value,
}

/// Converts a JSON scalar into the stored text form.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn settings_error(e: SettingsError) -> Response {
    match e {
        SettingsError::EmptyKey
        | SettingsError::KeyTooLong
        | SettingsError::InvalidValue { .. } => {
            warn!(error = %e, "Invalid setting");
            app_error(&AppError::Validation(e.to_string()))
        }
        SettingsError::Database(e) => internal_error(&e, "Settings query failed"),
    }
}

/// GET `/settings` - All settings as a key to value map.
async fn list_settings(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = SettingsRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => settings_error(e),
    }
}

/// PATCH `/settings` - Insert or update one setting.
async fn update_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateSettingRequest>,
) -> impl IntoResponse {
    let Some(value) = value_text(&payload.value).filter(|_| !payload.key.trim().is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "Key and value are required",
        );
    };

    let repo = SettingsRepository::new((*state.db).clone());
    match repo.upsert(&payload.key, &value).await {
        Ok(setting) => {
            info!(key = %setting.key, user_id = %auth.user_id(), "Setting updated");
            (
                StatusCode::OK,
                Json(json!({
                    "key": setting.key,
                    "value": setting.value,
                    "description": setting.description,
                    "updated_at": setting.updated_at
                })),
            )
                .into_response()
        }
        Err(e) => settings_error(e),
    }
}
