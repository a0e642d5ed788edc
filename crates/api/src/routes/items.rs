//! Item catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use quotedesk_core::directory::{CatalogItemInput, ItemCategory, NewCatalogItem};
use quotedesk_db::{
    entities::item_catalog,
    repositories::{ItemError, ItemFilter, ItemRepository},
};
use quotedesk_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::{app_error, error_response, internal_error};
use crate::{AppState, extract::ApiJson, middleware::AuthUser};

/// Creates the catalog routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Filter by category name.
    pub category: Option<String>,
    /// Only active items when true.
    pub active: Option<bool>,
}

/// Response for a catalog item.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Category.
    pub category: ItemCategory,
    /// Item name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Unit of measure.
    pub unit: String,
    /// Default price per unit.
    pub default_rate: Decimal,
    /// Whether the item is offered.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<item_catalog::Model> for ItemResponse {
    fn from(item: item_catalog::Model) -> Self {
        Self {
            id: item.id,
            category: item.category.into(),
            name: item.name,
            description: item.description,
            unit: item.unit,
            default_rate: item.default_rate,
            is_active: item.is_active,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

fn item_error(e: ItemError) -> Response {
    match e {
        ItemError::NotFound(id) => {
            warn!(item_id = %id, "Item not found");
            app_error(&AppError::NotFound("Item".to_string()))
        }
        ItemError::Database(e) => internal_error(&e, "Item query failed"),
    }
}

fn validate(payload: CatalogItemInput) -> Result<NewCatalogItem, Response> {
    NewCatalogItem::new(payload).map_err(|e| {
        warn!(error = %e, "Invalid catalog item");
        error_response(StatusCode::BAD_REQUEST, e.error_code(), e.to_string())
    })
}

/// GET `/items` - List catalog items by category and name.
async fn list_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListItemsQuery>,
) -> impl IntoResponse {
    let category = match query.category.as_deref().map(str::parse::<ItemCategory>) {
        None => None,
        Some(Ok(category)) => Some(category),
        Some(Err(e)) => {
            return error_response(StatusCode::BAD_REQUEST, e.error_code(), e.to_string());
        }
    };

    let filter = ItemFilter {
        category,
        active_only: query.active.unwrap_or(false),
    };

    let repo = ItemRepository::new((*state.db).clone());
    match repo.list(&filter).await {
        Ok(items) => {
            let response: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
            (StatusCode::OK, Json(json!({ "items": response }))).into_response()
        }
        Err(e) => item_error(e),
    }
}

/// POST `/items` - Create a catalog item.
async fn create_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(payload): ApiJson<CatalogItemInput>,
) -> impl IntoResponse {
    let input = match validate(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = ItemRepository::new((*state.db).clone());
    match repo.create(&input).await {
        Ok(item) => (StatusCode::CREATED, Json(ItemResponse::from(item))).into_response(),
        Err(e) => item_error(e),
    }
}

/// GET `/items/{item_id}` - Get a catalog item.
async fn get_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ItemRepository::new((*state.db).clone());

    match repo.find_by_id(item_id).await {
        Ok(Some(item)) => (StatusCode::OK, Json(ItemResponse::from(item))).into_response(),
        Ok(None) => item_error(ItemError::NotFound(item_id)),
        Err(e) => item_error(e),
    }
}

/// PUT `/items/{item_id}` - Replace a catalog item.
async fn update_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(item_id): Path<Uuid>,
    ApiJson(payload): ApiJson<CatalogItemInput>,
) -> impl IntoResponse {
    let input = match validate(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = ItemRepository::new((*state.db).clone());
    match repo.update(item_id, &input).await {
        Ok(item) => (StatusCode::OK, Json(ItemResponse::from(item))).into_response(),
        Err(e) => item_error(e),
    }
}

/// DELETE `/items/{item_id}` - Delete a catalog item.
async fn delete_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ItemRepository::new((*state.db).clone());

    match repo.delete(item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => item_error(e),
    }
}
