use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{FieldViolation, RegistrationError};
use crate::types::dto::common::{ErrorResponse, FieldErrorDetail, ValidationErrorResponse};

/// Signup endpoint error types
#[derive(ApiResponse, Debug)]
pub enum SignupError {
    /// Malformed input with field-level violations
    #[oai(status = 422)]
    UnprocessableEntity(Json<ValidationErrorResponse>),

    /// Business-rule conflict (duplicate email, occupied jurisdiction)
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Visibility retry budget or caller deadline exhausted; safe to retry
    #[oai(status = 504)]
    GatewayTimeout(Json<ErrorResponse>),

    /// Transient infrastructure failure; safe to retry with backoff
    #[oai(status = 503)]
    ServiceUnavailable(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl SignupError {
    /// Create a validation error with field-level detail
    pub fn validation_failed(violations: Vec<FieldViolation>) -> Self {
        SignupError::UnprocessableEntity(Json(ValidationErrorResponse {
            error_code: "VALIDATION_FAILED".to_string(),
            message: "Signup input failed validation".to_string(),
            fields: violations
                .into_iter()
                .map(|v| FieldErrorDetail {
                    field: v.field,
                    message: v.message,
                })
                .collect(),
        }))
    }

    /// Create an email-conflict error
    pub fn email_already_registered() -> Self {
        SignupError::Conflict(Json(ErrorResponse {
            error_code: "EMAIL_ALREADY_REGISTERED".to_string(),
            message: "This email address is already registered".to_string(),
            retryable: false,
        }))
    }

    /// Create a jurisdiction-conflict error
    pub fn jurisdiction_already_administered() -> Self {
        SignupError::Conflict(Json(ErrorResponse {
            error_code: "JURISDICTION_ALREADY_ADMINISTERED".to_string(),
            message: "This barangay already has an active administrator".to_string(),
            retryable: false,
        }))
    }

    /// Create a propagation-timeout error
    pub fn propagation_timeout() -> Self {
        SignupError::GatewayTimeout(Json(ErrorResponse {
            error_code: "PROPAGATION_TIMEOUT".to_string(),
            message: "Registration timed out waiting for account propagation; please try again"
                .to_string(),
            retryable: true,
        }))
    }

    /// Create a deadline-exceeded error
    pub fn deadline_exceeded() -> Self {
        SignupError::GatewayTimeout(Json(ErrorResponse {
            error_code: "DEADLINE_EXCEEDED".to_string(),
            message: "Registration took too long; please try again".to_string(),
            retryable: true,
        }))
    }

    /// Create a store-unavailable error
    pub fn store_unavailable() -> Self {
        SignupError::ServiceUnavailable(Json(ErrorResponse {
            error_code: "STORE_UNAVAILABLE".to_string(),
            message: "The service is temporarily unavailable; please try again".to_string(),
            retryable: true,
        }))
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        SignupError::InternalError(Json(ErrorResponse {
            error_code: "INTERNAL_ERROR".to_string(),
            message: "An internal error occurred".to_string(),
            retryable: false,
        }))
    }

    /// Convert RegistrationError to SignupError
    ///
    /// This is the explicit conversion point from workflow errors to API
    /// errors. Infrastructure detail is logged but not exposed to clients.
    pub fn from_registration_error(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(violations) => {
                tracing::debug!(violations = violations.len(), "signup input rejected");
                Self::validation_failed(violations)
            }
            RegistrationError::UnknownRole(role_name) => {
                tracing::debug!(%role_name, "signup with unknown role");
                Self::validation_failed(vec![FieldViolation::new(
                    "role_name",
                    "does not name a known role",
                )])
            }
            RegistrationError::IdentityConflict(_) => {
                tracing::debug!("signup for already-registered email");
                Self::email_already_registered()
            }
            RegistrationError::PropagationTimeout {
                ref identity_id,
                attempts,
                elapsed,
            } => {
                tracing::warn!(
                    %identity_id,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "identity never became visible within the retry budget"
                );
                Self::propagation_timeout()
            }
            RegistrationError::JurisdictionAlreadyAdministered(ref code) => {
                tracing::debug!(jurisdiction_code = %code, "jurisdiction admin slot occupied");
                Self::jurisdiction_already_administered()
            }
            RegistrationError::DeadlineExceeded => {
                tracing::warn!("registration aborted by caller deadline");
                Self::deadline_exceeded()
            }
            RegistrationError::IdentityUnavailable(ref message) => {
                tracing::error!(%message, "identity provider unavailable");
                Self::store_unavailable()
            }
            RegistrationError::Store(ref source) => {
                tracing::error!(%source, "profile store unavailable");
                Self::store_unavailable()
            }
        }
    }

    /// Get the stable error code of this error
    pub fn error_code(&self) -> String {
        match self {
            SignupError::UnprocessableEntity(json) => json.0.error_code.clone(),
            SignupError::Conflict(json) => json.0.error_code.clone(),
            SignupError::GatewayTimeout(json) => json.0.error_code.clone(),
            SignupError::ServiceUnavailable(json) => json.0.error_code.clone(),
            SignupError::InternalError(json) => json.0.error_code.clone(),
        }
    }
}

impl fmt::Display for SignupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_code())
    }
}
