use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Standardized error response body
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Whether the client may safely retry the same request
    pub retryable: bool,
}

/// A single field-level validation violation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct FieldErrorDetail {
    /// Name of the offending request field
    pub field: String,

    /// What is wrong with it
    pub message: String,
}

/// Error response body for validation failures (422)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    /// Stable machine-readable error code
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field violations
    pub fields: Vec<FieldErrorDetail>,
}

/// Response model for health check
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}
