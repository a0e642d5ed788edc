//! Customer management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use quotedesk_core::directory::{CustomerInput, NewCustomer};
use quotedesk_db::{
    entities::customers,
    repositories::{CustomerError, CustomerRepository},
};
use quotedesk_shared::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::{app_error, error_response, internal_error};
use crate::{AppState, extract::ApiJson, middleware::AuthUser};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{customer_id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Response for a customer.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    /// Customer ID.
    pub id: Uuid,
    /// Company name.
    pub company_name: String,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<customers::Model> for CustomerResponse {
    fn from(c: customers::Model) -> Self {
        Self {
            id: c.id,
            company_name: c.company_name,
            contact_person: c.contact_person,
            phone: c.phone,
            email: c.email,
            address: c.address,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

fn customer_error(e: CustomerError) -> axum::response::Response {
    match e {
        CustomerError::NotFound(id) => {
            warn!(customer_id = %id, "Customer not found");
            app_error(&AppError::NotFound("Customer".to_string()))
        }
        CustomerError::InUse { id, quotations } => {
            warn!(customer_id = %id, quotations, "Customer still referenced");
            app_error(&AppError::Conflict(format!(
                "Customer is referenced by {quotations} quotation(s)"
            )))
        }
        CustomerError::Database(e) => internal_error(&e, "Customer query failed"),
    }
}

fn validate(payload: CustomerInput) -> Result<NewCustomer, axum::response::Response> {
    NewCustomer::new(payload).map_err(|e| {
        warn!(error = %e, "Invalid customer");
        error_response(StatusCode::BAD_REQUEST, e.error_code(), e.to_string())
    })
}

/// GET `/customers` - List customers by company name.
async fn list_customers(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(customers) => {
            let response: Vec<CustomerResponse> =
                customers.into_iter().map(CustomerResponse::from).collect();
            (StatusCode::OK, Json(json!({ "customers": response }))).into_response()
        }
        Err(e) => customer_error(e),
    }
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiJson(payload): ApiJson<CustomerInput>,
) -> impl IntoResponse {
    let input = match validate(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.create(&input).await {
        Ok(customer) => {
            (StatusCode::CREATED, Json(CustomerResponse::from(customer))).into_response()
        }
        Err(e) => customer_error(e),
    }
}

/// GET `/customers/{customer_id}` - Get a customer.
async fn get_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.find_by_id(customer_id).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(CustomerResponse::from(customer))).into_response(),
        Ok(None) => customer_error(CustomerError::NotFound(customer_id)),
        Err(e) => customer_error(e),
    }
}

/// PUT `/customers/{customer_id}` - Replace a customer's details.
async fn update_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(customer_id): Path<Uuid>,
    ApiJson(payload): ApiJson<CustomerInput>,
) -> impl IntoResponse {
    let input = match validate(payload) {
        Ok(input) => input,
        Err(response) => return response,
    };

    let repo = CustomerRepository::new((*state.db).clone());
    match repo.update(customer_id, &input).await {
        Ok(customer) => (StatusCode::OK, Json(CustomerResponse::from(customer))).into_response(),
        Err(e) => customer_error(e),
    }
}

/// DELETE `/customers/{customer_id}` - Delete an unreferenced customer.
async fn delete_customer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.delete(customer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => customer_error(e),
    }
}
