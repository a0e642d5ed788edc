//! Quotation routes, including spreadsheet download.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use quotedesk_core::export::{
    CustomerDetails, ExportLine, QuotationDocument, XLSX_CONTENT_TYPE, download_filename,
    render_quotation,
};
use quotedesk_core::pricing::DocumentTotals;
use quotedesk_core::quotation::{
    NewQuotation, NewQuotationInput, QuotationStatus, QuotationUpdateInput,
};
use quotedesk_db::{
    entities::{customers, quotation_items},
    repositories::{
        QuotationDetails, QuotationFilter, QuotationRepoError, QuotationRepository,
        QuotationSummary, SettingsRepository,
    },
};
use quotedesk_shared::AppError;
use quotedesk_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{app_error, error_response, internal_error};
use crate::{AppState, extract::ApiJson, middleware::AuthUser};

/// Creates the quotation routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", get(list_quotations).post(create_quotation))
        .route(
            "/quotations/{quotation_id}",
            get(get_quotation)
                .patch(update_quotation)
                .delete(delete_quotation),
        )
        .route("/quotations/{quotation_id}/download", get(download_quotation))
}

/// Query parameters for listing quotations.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuotationsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Customer fields embedded in quotation responses.
#[derive(Debug, Serialize)]
pub struct CustomerRef {
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
}

impl From<customers::Model> for CustomerRef {
    fn from(c: customers::Model) -> Self {
        Self {
            id: c.id,
            company_name: c.company_name,
            contact_person: c.contact_person,
            phone: c.phone,
            email: c.email,
        }
    }
}

/// Creator fields embedded in quotation responses.
#[derive(Debug, Serialize)]
pub struct CreatorRef {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Response for a quotation line.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Scope of work.
    pub scope_of_work: String,
    /// Description.
    pub description: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// VAT amount of the line.
    pub vat_rate: Decimal,
    /// `quantity * rate`.
    pub sub_total: Decimal,
    /// Position in the quotation.
    pub sort_order: i32,
}

impl From<quotation_items::Model> for LineItemResponse {
    fn from(item: quotation_items::Model) -> Self {
        Self {
            id: item.id,
            scope_of_work: item.scope_of_work,
            description: item.description,
            quantity: item.quantity,
            rate: item.rate,
            vat_rate: item.vat_rate,
            sub_total: item.sub_total,
            sort_order: item.sort_order,
        }
    }
}

/// Full quotation response.
#[derive(Debug, Serialize)]
pub struct QuotationResponse {
    /// Quotation ID.
    pub id: Uuid,
    /// Human-readable number, e.g. `CRY-2025-0001`.
    pub quotation_number: String,
    /// Customer ID.
    pub customer_id: Uuid,
    /// Customer details.
    pub customer: Option<CustomerRef>,
    /// Project name.
    pub project_name: String,
    /// Site location.
    pub site_location: Option<String>,
    /// Lifecycle status.
    pub status: QuotationStatus,
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// VAT percentage.
    pub vat_percentage: Decimal,
    /// VAT amount.
    pub vat_amount: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Internal notes.
    pub notes: Option<String>,
    /// Terms and conditions.
    pub terms: Option<String>,
    /// Creator.
    pub created_by: Option<CreatorRef>,
    /// Line items ordered by `sort_order`.
    pub items: Vec<LineItemResponse>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Last update timestamp.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<QuotationDetails> for QuotationResponse {
    fn from(details: QuotationDetails) -> Self {
        let q = details.quotation;
        Self {
            id: q.id,
            quotation_number: q.quotation_number,
            customer_id: q.customer_id,
            customer: details.customer.map(CustomerRef::from),
            project_name: q.project_name,
            site_location: q.site_location,
            status: q.status.into(),
            subtotal: q.subtotal,
            vat_percentage: q.vat_percentage,
            vat_amount: q.vat_amount,
            total: q.total,
            notes: q.notes,
            terms: q.terms,
            created_by: details.created_by.map(|u| CreatorRef {
                id: u.id,
                name: u.name,
            }),
            items: details.items.into_iter().map(LineItemResponse::from).collect(),
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Quotation row in listings.
#[derive(Debug, Serialize)]
pub struct QuotationSummaryResponse {
    /// Quotation ID.
    pub id: Uuid,
    /// Human-readable number.
    pub quotation_number: String,
    /// Project name.
    pub project_name: String,
    /// Lifecycle status.
    pub status: QuotationStatus,
    /// Grand total.
    pub total: Decimal,
    /// Customer details.
    pub customer: Option<CustomerRef>,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<QuotationSummary> for QuotationSummaryResponse {
    fn from(summary: QuotationSummary) -> Self {
        let q = summary.quotation;
        Self {
            id: q.id,
            quotation_number: q.quotation_number,
            project_name: q.project_name,
            status: q.status.into(),
            total: q.total,
            customer: summary.customer.map(CustomerRef::from),
            created_at: q.created_at,
        }
    }
}

fn quotation_error(e: QuotationRepoError) -> Response {
    match e {
        QuotationRepoError::NotFound(id) => {
            warn!(quotation_id = %id, "Quotation not found");
            app_error(&AppError::NotFound("Quotation".to_string()))
        }
        QuotationRepoError::CustomerNotFound(id) => {
            warn!(customer_id = %id, "Quotation references unknown customer");
            app_error(&AppError::NotFound(format!("Customer {id}")))
        }
        QuotationRepoError::CreatorNotFound(id) => {
            warn!(user_id = %id, "Token subject is not a provisioned user");
            error_response(
                StatusCode::FORBIDDEN,
                "unknown_user",
                "Authenticated user is not provisioned",
            )
        }
        QuotationRepoError::Validation(e) if e.is_client_error() => {
            warn!(error = %e, "Invalid quotation");
            error_response(StatusCode::BAD_REQUEST, e.error_code(), e.to_string())
        }
        QuotationRepoError::Validation(e) => internal_error(&e, "Quotation numbering failed"),
        QuotationRepoError::NumberConflict(attempts) => {
            warn!(attempts, "Quotation number still conflicting after retries");
            app_error(&AppError::Conflict(
                "Could not assign a unique quotation number, please retry".to_string(),
            ))
        }
        QuotationRepoError::Database(e) => internal_error(&e, "Quotation query failed"),
    }
}

/// Builds the export input from a stored quotation. Totals are taken as
/// stored.
fn export_document(details: &QuotationDetails) -> QuotationDocument {
    let q = &details.quotation;
    let customer = details
        .customer
        .as_ref()
        .map(|c| CustomerDetails {
            company_name: c.company_name.clone(),
            contact_person: c.contact_person.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
        })
        .unwrap_or_default();

    QuotationDocument {
        quotation_number: q.quotation_number.clone(),
        created_at: q.created_at.with_timezone(&Utc),
        project_name: q.project_name.clone(),
        site_location: q.site_location.clone(),
        customer,
        items: details
            .items
            .iter()
            .map(|item| ExportLine {
                scope_of_work: item.scope_of_work.clone(),
                description: item.description.clone(),
                quantity: item.quantity,
                rate: item.rate,
                vat_rate: item.vat_rate,
                sub_total: item.sub_total,
            })
            .collect(),
        vat_percentage: q.vat_percentage,
        totals: DocumentTotals {
            subtotal: q.subtotal,
            vat_amount: q.vat_amount,
            total: q.total,
        },
        terms: q.terms.clone(),
        prepared_by: details.created_by.as_ref().map(|u| u.name.clone()),
    }
}

/// GET `/quotations` - List quotations, newest first.
async fn list_quotations(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListQuotationsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref().map(str::parse::<QuotationStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => {
            return error_response(StatusCode::BAD_REQUEST, e.error_code(), e.to_string());
        }
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    }
    .normalized();

    let filter = QuotationFilter {
        status,
        customer_id: query.customer_id,
    };

    let repo = QuotationRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let data = rows
                .into_iter()
                .map(QuotationSummaryResponse::from)
                .collect();
            let response = PageResponse::new(data, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => quotation_error(e),
    }
}

/// POST `/quotations` - Number and store a new quotation.
async fn create_quotation(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<NewQuotationInput>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return quotation_error(e.into());
    }

    let settings = SettingsRepository::new((*state.db).clone());
    let defaults = match settings.quotation_defaults().await {
        Ok(defaults) => defaults,
        Err(e) => return internal_error(&e, "Failed to load quotation defaults"),
    };

    let quotation = match NewQuotation::new(payload, &defaults) {
        Ok(quotation) => quotation,
        Err(e) => return quotation_error(e.into()),
    };

    let repo = QuotationRepository::new((*state.db).clone());
    let year = Utc::now().year();

    match repo
        .create_quotation(&quotation, auth.user_id(), &defaults.prefix, year)
        .await
    {
        Ok(details) => {
            info!(
                quotation_number = %details.quotation.quotation_number,
                user_id = %auth.user_id(),
                role = %auth.role(),
                "Quotation created via API"
            );
            (StatusCode::CREATED, Json(QuotationResponse::from(details))).into_response()
        }
        Err(e) => quotation_error(e),
    }
}

/// GET `/quotations/{quotation_id}` - Get a quotation with items.
async fn get_quotation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new((*state.db).clone());

    match repo.find_by_id(quotation_id).await {
        Ok(Some(details)) => (StatusCode::OK, Json(QuotationResponse::from(details))).into_response(),
        Ok(None) => quotation_error(QuotationRepoError::NotFound(quotation_id)),
        Err(e) => quotation_error(e),
    }
}

/// PATCH `/quotations/{quotation_id}` - Partially update a quotation.
async fn update_quotation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(quotation_id): Path<Uuid>,
    ApiJson(payload): ApiJson<QuotationUpdateInput>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new((*state.db).clone());

    match repo.update_quotation(quotation_id, payload).await {
        Ok(details) => (StatusCode::OK, Json(QuotationResponse::from(details))).into_response(),
        Err(e) => quotation_error(e),
    }
}

/// DELETE `/quotations/{quotation_id}` - Delete a quotation and its items.
async fn delete_quotation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new((*state.db).clone());

    match repo.delete(quotation_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => quotation_error(e),
    }
}

/// GET `/quotations/{quotation_id}/download` - Spreadsheet attachment.
async fn download_quotation(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new((*state.db).clone());

    let details = match repo.find_by_id(quotation_id).await {
        Ok(Some(details)) => details,
        Ok(None) => return quotation_error(QuotationRepoError::NotFound(quotation_id)),
        Err(e) => return quotation_error(e),
    };

    let document = export_document(&details);
    let bytes = match render_quotation(&document, &state.company) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Failed to render quotation workbook");
            return app_error(&AppError::Export(e.to_string()));
        }
    };

    let filename = download_filename(&document.quotation_number, &document.project_name);
    let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
    else {
        error!(filename = %filename, "Download file name is not a valid header value");
        return app_error(&AppError::Export(filename));
    };

    info!(quotation_id = %quotation_id, bytes = bytes.len(), "Quotation exported");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotedesk_core::export::CompanyProfile;
    use quotedesk_core::quotation::QuotationError;
    use quotedesk_db::entities::{quotations, sea_orm_active_enums, users};
    use rust_decimal_macros::dec;

    fn details() -> QuotationDetails {
        let created_at = DateTime::parse_from_rfc3339("2025-03-14T09:30:00+04:00").unwrap();
        let quotation_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        QuotationDetails {
            quotation: quotations::Model {
                id: quotation_id,
                quotation_number: "CRY-2025-0007".to_string(),
                customer_id,
                project_name: "Villa Facade".to_string(),
                site_location: Some("Jumeirah".to_string()),
                status: sea_orm_active_enums::QuotationStatus::Draft,
                subtotal: dec!(3225.00),
                vat_percentage: dec!(5),
                vat_amount: dec!(161.25),
                total: dec!(3386.25),
                notes: None,
                terms: Some("50% advance".to_string()),
                created_by_id: user_id,
                created_at,
                updated_at: created_at,
            },
            items: vec![quotation_items::Model {
                id: Uuid::new_v4(),
                quotation_id,
                scope_of_work: "12mm Clear Tempered Glass".to_string(),
                description: None,
                quantity: dec!(10),
                rate: dec!(280.00),
                vat_rate: dec!(140),
                sub_total: dec!(2800.00),
                sort_order: 0,
            }],
            customer: Some(customers::Model {
                id: customer_id,
                company_name: "Emirates Development LLC".to_string(),
                contact_person: Some("Ahmed".to_string()),
                phone: None,
                email: None,
                address: None,
                created_at,
                updated_at: created_at,
            }),
            created_by: Some(users::Model {
                id: user_id,
                name: "Sara".to_string(),
                email: "sara@example.com".to_string(),
                role: sea_orm_active_enums::UserRole::Estimator,
                created_at,
            }),
        }
    }

    #[test]
    fn test_export_document_uses_stored_values() {
        let doc = export_document(&details());

        assert_eq!(doc.quotation_number, "CRY-2025-0007");
        assert_eq!(doc.customer.company_name, "Emirates Development LLC");
        assert_eq!(doc.totals.total, dec!(3386.25));
        assert_eq!(doc.items[0].vat_rate, dec!(140));
        assert_eq!(doc.prepared_by.as_deref(), Some("Sara"));
        assert_eq!(doc.date_label(CompanyProfile::default().utc_offset), "14/03/2025");
    }

    #[test]
    fn test_export_document_without_relations() {
        let mut details = details();
        details.customer = None;
        details.created_by = None;

        let doc = export_document(&details);
        assert_eq!(doc.customer, CustomerDetails::default());
        assert_eq!(doc.prepared_by, None);
    }

    #[test]
    fn test_response_renders_money_as_strings() {
        let body = serde_json::to_value(QuotationResponse::from(details())).unwrap();

        assert_eq!(body["status"], "DRAFT");
        assert_eq!(body["total"], "3386.25");
        assert_eq!(body["items"][0]["sub_total"], "2800.00");
        assert_eq!(body["created_by"]["name"], "Sara");
    }

    #[test]
    fn test_repository_errors_map_to_status() {
        let id = Uuid::new_v4();
        let cases = [
            (QuotationRepoError::NotFound(id), StatusCode::NOT_FOUND),
            (QuotationRepoError::CustomerNotFound(id), StatusCode::NOT_FOUND),
            (QuotationRepoError::CreatorNotFound(id), StatusCode::FORBIDDEN),
            (
                QuotationRepoError::Validation(QuotationError::NoLineItems),
                StatusCode::BAD_REQUEST,
            ),
            (QuotationRepoError::NumberConflict(5), StatusCode::CONFLICT),
        ];

        for (err, expected) in cases {
            assert_eq!(quotation_error(err).status(), expected);
        }
    }
}
