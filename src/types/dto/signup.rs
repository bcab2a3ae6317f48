use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::profile;

/// Request model for resident/user signup
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Email address used as the login identifier
    pub email: String,

    /// Plaintext password; strength policy is enforced by the identity provider
    pub password: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Role name, e.g. "barangay_admin" or "staff"
    pub role_name: String,

    /// PSGC barangay code; required for jurisdiction-scoped roles
    pub jurisdiction_code: Option<String>,
}

/// Created profile, without any credential material
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Profile id (equals the identity id)
    pub id: String,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Assigned role id
    pub role_id: String,

    /// PSGC barangay code, if the role is jurisdiction-scoped
    pub jurisdiction_code: Option<String>,

    /// Approval status: pending_approval, active, or rejected
    pub status: String,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<profile::Model> for ProfileResponse {
    fn from(p: profile::Model) -> Self {
        Self {
            id: p.id,
            email: p.email,
            first_name: p.first_name,
            last_name: p.last_name,
            role_id: p.role_id,
            jurisdiction_code: p.jurisdiction_code,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

/// Success response for the signup endpoint
#[derive(ApiResponse)]
pub enum SignupSuccess {
    /// Profile created (or idempotently completed)
    #[oai(status = 201)]
    Created(Json<ProfileResponse>),
}

/// Response model for the advisory jurisdiction admin-status query
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct JurisdictionAdminStatusResponse {
    /// PSGC barangay code
    pub jurisdiction_code: String,

    /// Whether an active (non-rejected) admin profile holds this jurisdiction.
    /// Advisory only; the signup transaction is authoritative.
    pub has_admin: bool,
}
