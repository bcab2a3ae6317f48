use std::sync::Arc;
use std::time::Duration;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use tokio::time::Instant;

use crate::api::Api;
use crate::app_data::AppData;
use crate::coordinators::RegistrationCoordinator;
use crate::errors::api::SignupError;
use crate::types::dto::signup::{ProfileResponse, SignupRequest, SignupSuccess};
use crate::types::internal::context::RequestContext;

/// Signup API endpoint
///
/// A thin boundary over the registration coordinator: extracts request
/// metadata, applies the server-configured deadline, and maps workflow
/// errors to HTTP responses.
pub struct SignupApi {
    coordinator: Arc<RegistrationCoordinator>,
    deadline: Option<Duration>,
}

impl SignupApi {
    /// Create a new SignupApi from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            deadline: app_data.registration_deadline,
            coordinator: Arc::new(RegistrationCoordinator::new(app_data)),
        }
    }
}

impl Api for SignupApi {}

/// API tags for signup endpoints
#[derive(Tags)]
enum SignupTags {
    /// Resident and user registration
    Registration,
}

#[OpenApi]
impl SignupApi {
    /// Register a resident or user
    ///
    /// Creates the authentication identity, waits for it to propagate,
    /// reserves the barangay admin slot when the role requires one, and
    /// persists the profile - all as one atomic operation from the caller's
    /// point of view. Safe to retry on 504: the flow is idempotent per
    /// email and password.
    #[oai(path = "/signup", method = "post", tag = "SignupTags::Registration")]
    async fn signup(
        &self,
        req: &Request,
        body: Json<SignupRequest>,
    ) -> Result<SignupSuccess, SignupError> {
        let ctx = RequestContext::with_ip(self.extract_ip_address(req));
        let deadline = self.deadline.map(|d| Instant::now() + d);

        let profile = self
            .coordinator
            .register(&ctx, &body.0, deadline)
            .await
            .map_err(SignupError::from_registration_error)?;

        Ok(SignupSuccess::Created(Json(ProfileResponse::from(profile))))
    }
}
