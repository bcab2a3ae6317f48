use std::fmt;

use crate::errors::internal::{FieldViolation, RegistrationError};
use crate::types::dto::signup::SignupRequest;

/// Approval status of a profile.
///
/// Transitions out of PendingApproval are handled by the separate approval
/// workflow; this subsystem only ever writes PendingApproval and reads the
/// others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    PendingApproval,
    Active,
    Rejected,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::PendingApproval => "pending_approval",
            ProfileStatus::Active => "active",
            ProfileStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signup input that has passed syntactic validation.
///
/// Construction through validate() is the only way to obtain one, so any
/// NewRegistration reaching the coordinator's later steps is well-formed.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_name: String,
    pub jurisdiction_code: Option<String>,
}

impl NewRegistration {
    /// Validate a raw signup request into a well-formed registration input.
    ///
    /// Collects all field violations instead of failing on the first, so the
    /// client can fix everything in one round trip. Role existence and
    /// jurisdiction existence are checked by the coordinator against the
    /// reference stores, not here.
    pub fn validate(request: &SignupRequest) -> Result<Self, RegistrationError> {
        let mut violations = Vec::new();

        let email = request.email.trim().to_lowercase();
        if email.is_empty() {
            violations.push(FieldViolation::new("email", "is required"));
        } else if !is_valid_email(&email) {
            violations.push(FieldViolation::new("email", "is not a valid email address"));
        }

        if request.password.is_empty() {
            violations.push(FieldViolation::new("password", "is required"));
        }

        let first_name = request.first_name.trim().to_string();
        if first_name.is_empty() {
            violations.push(FieldViolation::new("first_name", "is required"));
        }

        let last_name = request.last_name.trim().to_string();
        if last_name.is_empty() {
            violations.push(FieldViolation::new("last_name", "is required"));
        }

        let role_name = request.role_name.trim().to_string();
        if role_name.is_empty() {
            violations.push(FieldViolation::new("role_name", "is required"));
        }

        // Treat a blank jurisdiction code as absent
        let jurisdiction_code = request
            .jurisdiction_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        if !violations.is_empty() {
            return Err(RegistrationError::Validation(violations));
        }

        Ok(Self {
            email,
            password: request.password.clone(),
            first_name,
            last_name,
            role_name,
            jurisdiction_code,
        })
    }
}

/// Minimal syntactic email check: one '@', non-empty local part, and a
/// domain containing a dot. Deliverability is the identity provider's
/// problem.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // Reject a second '@' and dot-less or dot-edged domains
    !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Fields of a profile row to be written by the idempotent upsert.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: String,
    pub jurisdiction_code: Option<String>,
    pub status: ProfileStatus,
}
