use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::app_data::AppData;
use crate::errors::api::JurisdictionError;
use crate::stores::{JurisdictionStore, ProfileStore};
use crate::types::dto::signup::JurisdictionAdminStatusResponse;

/// Jurisdiction lookup API
pub struct JurisdictionApi {
    jurisdiction_store: Arc<JurisdictionStore>,
    profile_store: Arc<ProfileStore>,
}

impl JurisdictionApi {
    /// Create a new JurisdictionApi from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            jurisdiction_store: app_data.jurisdiction_store.clone(),
            profile_store: app_data.profile_store.clone(),
        }
    }
}

/// API tags for jurisdiction endpoints
#[derive(Tags)]
enum JurisdictionTags {
    /// Jurisdiction reference lookups
    Jurisdictions,
}

#[OpenApi]
impl JurisdictionApi {
    /// Advisory admin-occupancy check for a barangay
    ///
    /// Intended for UI pre-flight hints. The result can be stale the moment
    /// it returns; the signup transaction is the authoritative check.
    #[oai(
        path = "/jurisdictions/:code/admin-status",
        method = "get",
        tag = "JurisdictionTags::Jurisdictions"
    )]
    async fn admin_status(
        &self,
        code: Path<String>,
    ) -> Result<Json<JurisdictionAdminStatusResponse>, JurisdictionError> {
        let jurisdiction = self
            .jurisdiction_store
            .find(&code.0)
            .await
            .map_err(JurisdictionError::from_database_error)?
            .ok_or_else(|| JurisdictionError::not_found(&code.0))?;

        let has_admin = self
            .profile_store
            .jurisdiction_admin_status(&jurisdiction.code)
            .await
            .map_err(JurisdictionError::from_database_error)?;

        Ok(Json(JurisdictionAdminStatusResponse {
            jurisdiction_code: jurisdiction.code,
            has_admin,
        }))
    }
}
