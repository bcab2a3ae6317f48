use thiserror::Error;

/// Failures reported by the identity provider boundary.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The email already has an identity and the supplied password does not
    /// verify against it.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// The password failed the provider's strength policy.
    #[error("password rejected: {0}")]
    WeakPassword(String),

    /// Transient provider/transport failure; retryable with backoff.
    #[error("identity provider unavailable: {operation} failed: {message}")]
    Unavailable { operation: String, message: String },
}

impl IdentityError {
    pub fn unavailable(operation: &str, message: String) -> Self {
        IdentityError::Unavailable {
            operation: operation.to_string(),
            message,
        }
    }
}
