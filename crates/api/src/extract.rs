//! Request body extraction.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use quotedesk_shared::AppError;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::routes::app_error;

/// JSON body extractor that reports unreadable payloads as 400
/// `validation_error`.
///
/// Missing fields, wrong types and malformed JSON are validation failures.
/// Other rejections (wrong content type, unreadable body) keep axum's status.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            warn!(error = %rejection.body_text(), "Rejected request body");
            app_error(&AppError::Validation(rejection.body_text()))
        }
        other => other.into_response(),
    }
}
