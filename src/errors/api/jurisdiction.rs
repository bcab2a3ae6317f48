use poem_openapi::{payload::Json, ApiResponse};

use crate::errors::internal::DatabaseError;
use crate::types::dto::common::ErrorResponse;

/// Jurisdiction lookup endpoint error types
#[derive(ApiResponse, Debug)]
pub enum JurisdictionError {
    /// The jurisdiction code is not in the reference data
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl JurisdictionError {
    /// Create a NotFound error
    pub fn not_found(code: &str) -> Self {
        JurisdictionError::NotFound(Json(ErrorResponse {
            error_code: "JURISDICTION_NOT_FOUND".to_string(),
            message: format!("Unknown jurisdiction code: {}", code),
            retryable: false,
        }))
    }

    /// Convert a store failure, logging the detail
    pub fn from_database_error(err: DatabaseError) -> Self {
        tracing::error!(%err, "jurisdiction lookup failed");
        JurisdictionError::InternalError(Json(ErrorResponse {
            error_code: "INTERNAL_ERROR".to_string(),
            message: "An internal error occurred".to_string(),
            retryable: false,
        }))
    }
}
