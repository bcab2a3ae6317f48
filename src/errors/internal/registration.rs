use std::time::Duration;

use thiserror::Error;

use crate::errors::internal::DatabaseError;

/// One field-level validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Terminal outcomes of the registration workflow.
///
/// Every failure the coordinator can return is one of these; the HTTP layer
/// maps them to status codes and stable error codes without ever exposing
/// infrastructure detail.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Malformed input, rejected before any side effect.
    #[error("signup input failed validation")]
    Validation(Vec<FieldViolation>),

    /// role_name does not resolve to a known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// The email belongs to a different identity; terminal with this email.
    #[error("email already registered: {0}")]
    IdentityConflict(String),

    /// The identity was created but never became visible to the profile
    /// store's read path within the retry budget. Retryable: re-invoking the
    /// whole signup is safe because identity creation and the profile upsert
    /// are both idempotent.
    #[error("identity {identity_id} not visible after {attempts} attempts over {elapsed:?}")]
    PropagationTimeout {
        identity_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// Another active admin profile already holds this jurisdiction.
    #[error("jurisdiction {0} already has an active administrator")]
    JurisdictionAlreadyAdministered(String),

    /// The caller-supplied deadline expired mid-flow. Completion state is
    /// ambiguous from the caller's view; retry is safe via idempotency.
    #[error("caller deadline expired during registration")]
    DeadlineExceeded,

    /// The identity provider could not be reached; retryable.
    #[error("identity provider unavailable: {0}")]
    IdentityUnavailable(String),

    /// The profile store could not be reached; retryable.
    #[error(transparent)]
    Store(#[from] DatabaseError),
}
