use std::sync::Arc;

use tokio::time::Instant;

use crate::app_data::AppData;
use crate::errors::internal::{FieldViolation, IdentityError, RegistrationError};
use crate::providers::IdentityProvider;
use crate::services::visibility::{await_visible, RetryPolicy, VisibilityError};
use crate::stores::{JurisdictionStore, ProfileStore, RoleStore};
use crate::types::db::profile;
use crate::types::dto::signup::SignupRequest;
use crate::types::internal::context::RequestContext;
use crate::types::internal::registration::{NewProfile, NewRegistration, ProfileStatus};

/// Registration coordinator that drives the end-to-end signup workflow
///
/// Each call runs as an independent task; the coordinator holds no mutable
/// state of its own, so any number of signups may run concurrently across
/// any number of processes. The jurisdiction-uniqueness invariant lives in
/// the profile store's reservation transaction, not here.
pub struct RegistrationCoordinator {
    identity_provider: Arc<dyn IdentityProvider>,
    profile_store: Arc<ProfileStore>,
    role_store: Arc<RoleStore>,
    jurisdiction_store: Arc<JurisdictionStore>,
    retry_policy: RetryPolicy,
}

impl RegistrationCoordinator {
    /// Create RegistrationCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            identity_provider: app_data.identity_provider.clone(),
            profile_store: app_data.profile_store.clone(),
            role_store: app_data.role_store.clone(),
            jurisdiction_store: app_data.jurisdiction_store.clone(),
            retry_policy: app_data.retry_policy.clone(),
        }
    }

    /// Drive a signup to a single success or a single typed failure
    ///
    /// Sequence of operations:
    /// 1. Validate input and resolve reference data (no side effects)
    /// 2. Create the identity via the identity provider
    /// 3. Await identity visibility on the read path, with bounded backoff
    /// 4. Reserve the jurisdiction slot and upsert the profile in one
    ///    transaction
    ///
    /// `deadline`, when given, bounds the whole call; it can only fire
    /// during the visibility wait, so a reservation is never left without
    /// its profile row.
    ///
    /// # Arguments
    /// * `ctx` - Request context for tracing
    /// * `request` - Raw signup request from the HTTP layer
    /// * `deadline` - Caller-supplied deadline, if any
    ///
    /// # Returns
    /// * `Result<profile::Model, RegistrationError>` - The persisted profile or a terminal error
    pub async fn register(
        &self,
        ctx: &RequestContext,
        request: &SignupRequest,
        deadline: Option<Instant>,
    ) -> Result<profile::Model, RegistrationError> {
        // Step 1: Validate - reject before any side effect
        let input = NewRegistration::validate(request)?;

        let role = self
            .role_store
            .find_by_name(&input.role_name)
            .await?
            .ok_or_else(|| RegistrationError::UnknownRole(input.role_name.clone()))?;

        let reserve_code = if role.jurisdiction_scoped {
            let code = input.jurisdiction_code.clone().ok_or_else(|| {
                RegistrationError::Validation(vec![FieldViolation::new(
                    "jurisdiction_code",
                    "is required for jurisdiction-scoped roles",
                )])
            })?;
            if !self.jurisdiction_store.exists(&code).await? {
                return Err(RegistrationError::Validation(vec![FieldViolation::new(
                    "jurisdiction_code",
                    "is not a known jurisdiction",
                )]));
            }
            Some(code)
        } else {
            None
        };

        let existing_profile = self.profile_store.find_by_email(&input.email).await?;

        // Step 2: CreateIdentity - idempotent per (email, password) at the
        // provider, so a whole-call retry lands on the same identity
        let identity = self
            .identity_provider
            .create_identity(&input.email, &input.password)
            .await
            .map_err(|e| match e {
                IdentityError::EmailTaken(email) => RegistrationError::IdentityConflict(email),
                IdentityError::WeakPassword(reason) => {
                    RegistrationError::Validation(vec![FieldViolation::new("password", &reason)])
                }
                IdentityError::Unavailable { .. } => {
                    RegistrationError::IdentityUnavailable(e.to_string())
                }
            })?;

        if let Some(profile) = existing_profile {
            if profile.id == identity.id {
                // The first attempt already completed; return its result
                tracing::info!(
                    request_id = %ctx.request_id,
                    profile_id = %profile.id,
                    "signup retry resolved to existing profile"
                );
                return Ok(profile);
            }
            // The email belongs to someone else's profile
            return Err(RegistrationError::IdentityConflict(input.email));
        }

        // Step 3: AwaitVisibility - poll the read path the profile insert
        // will depend on, not the write path that just acknowledged
        let provider = Arc::clone(&self.identity_provider);
        let identity_id = identity.id.clone();
        let visible = await_visible(
            move || {
                let provider = Arc::clone(&provider);
                let id = identity_id.clone();
                async move { provider.get_identity_by_id(&id).await }
            },
            &self.retry_policy,
            deadline,
        )
        .await
        .map_err(|e| match e {
            VisibilityError::Timeout { attempts, elapsed } => {
                RegistrationError::PropagationTimeout {
                    identity_id: identity.id.clone(),
                    attempts,
                    elapsed,
                }
            }
            VisibilityError::DeadlineExceeded => RegistrationError::DeadlineExceeded,
            VisibilityError::Lookup(err) => RegistrationError::IdentityUnavailable(err.to_string()),
        })?;

        // Step 4: Reserve the jurisdiction slot and persist the profile in a
        // single transaction
        let new_profile = NewProfile {
            id: visible.id,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role_id: role.id,
            jurisdiction_code: input.jurisdiction_code,
            status: ProfileStatus::PendingApproval,
        };

        let profile = self
            .profile_store
            .reserve_and_upsert(new_profile, reserve_code.as_deref())
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            profile_id = %profile.id,
            role = %input.role_name,
            jurisdiction = reserve_code.as_deref().unwrap_or("-"),
            "signup completed"
        );

        Ok(profile)
    }
}
