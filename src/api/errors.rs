use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::engine::{AggregationError, IngestError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid claims data")]
    InvalidClaims,
    #[error("{0}")]
    InvalidCsv(#[from] IngestError),
    #[error("Invalid request body")]
    InvalidBody,
    #[error("MRF file not found")]
    NotFound,
    #[error("Failed to transform claims to MRF format")]
    Aggregation(#[from] AggregationError)
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: String
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(NotFoundResponse { error: self.to_string() })).into_response()
            }
            ApiError::Aggregation(cause) => {
                error!("Error processing claims: {cause}");

                let details = match cause {
                    AggregationError::Validation(validation) => Some(validation.issues.clone()),
                    other => Some(vec![other.to_string()])
                };

                failure(StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), details)
            }
            ApiError::InvalidClaims | ApiError::InvalidCsv(_) | ApiError::InvalidBody => {
                warn!("Rejected request: {self}");
                failure(StatusCode::BAD_REQUEST, self.to_string(), None)
            }
        }
    }
}

fn failure(status: StatusCode, error: String, details: Option<Vec<String>>) -> Response {
    (status, Json(FailureResponse { success: false, error, details })).into_response()
}
