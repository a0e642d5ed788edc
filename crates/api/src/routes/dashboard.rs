//! Dashboard routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use quotedesk_db::repositories::DashboardRepository;
use serde_json::json;

use super::internal_error;
use super::quotations::QuotationSummaryResponse;
use crate::{AppState, middleware::AuthUser};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET `/dashboard` - Summary counts and the most recent quotations.
async fn get_dashboard(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());

    match repo.summary().await {
        Ok(summary) => {
            let recent: Vec<QuotationSummaryResponse> = summary
                .recent
                .into_iter()
                .map(QuotationSummaryResponse::from)
                .collect();

            (
                StatusCode::OK,
                Json(json!({
                    "total_quotations": summary.total_quotations,
                    "draft_quotations": summary.draft_quotations,
                    "customers": summary.customers,
                    "active_items": summary.active_items,
                    "recent_quotations": recent
                })),
            )
                .into_response()
        }
        Err(e) => internal_error(&e, "Failed to load dashboard"),
    }
}
