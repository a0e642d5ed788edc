//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use quotedesk_shared::AppError;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth_middleware};

pub mod customers;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod quotations;
pub mod settings;

/// Creates the API router with public routes and the protected routes that
/// need state for the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(customers::routes())
        .merge(items::routes())
        .merge(quotations::routes())
        .merge(settings::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Builds a `{"error", "message"}` response.
pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Renders an `AppError`; server-side messages are not echoed to clients.
pub(crate) fn app_error(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_server_error() {
        "An error occurred".to_string()
    } else {
        err.to_string()
    };
    error_response(status, err.error_code(), message)
}

/// Logs a server-side failure and returns a generic 500.
pub(crate) fn internal_error(err: &dyn std::fmt::Display, context: &str) -> Response {
    error!(error = %err, "{}", context);
    app_error(&AppError::Internal(err.to_string()))
}
