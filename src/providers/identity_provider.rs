use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::internal::IdentityError;
use crate::types::db::identity::{self, Entity as IdentityEntity};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Authentication principal as seen by the registration flow.
///
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}

impl From<identity::Model> for Identity {
    fn from(m: identity::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

/// Boundary to the external authentication service.
///
/// Writes acknowledged by create_identity are not guaranteed to be
/// immediately visible through get_identity_by_id - the read path may lag.
/// Callers bridge the gap with services::visibility::await_visible.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create the authentication principal for an email/password pair.
    ///
    /// Idempotent per (email, password): when the email already has an
    /// identity and the password verifies against its stored credential, the
    /// existing identity is returned instead of an error. This is what makes
    /// re-invoking a whole signup safe after a propagation timeout. A
    /// non-verifying password on an existing email is EmailTaken.
    async fn create_identity(&self, email: &str, password: &str)
        -> Result<Identity, IdentityError>;

    /// Read an identity by id over the provider's read path.
    async fn get_identity_by_id(&self, id: &str) -> Result<Option<Identity>, IdentityError>;
}

/// Identity provider backed by the identity database.
pub struct DbIdentityProvider {
    db: DatabaseConnection,
    password_pepper: String,
}

impl DbIdentityProvider {
    /// Create a new DbIdentityProvider
    ///
    /// # Arguments
    /// * `db` - Connection to the identity database
    /// * `password_pepper` - Secret mixed into every credential hash
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self { db, password_pepper }
    }

    /// Minimum-strength policy: length bounds plus at least one letter and
    /// one digit.
    fn check_password_policy(password: &str) -> Result<(), IdentityError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword(format!(
                "must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword(format!(
                "must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }
        if !password.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(IdentityError::WeakPassword(
                "must contain at least one letter".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(IdentityError::WeakPassword(
                "must contain at least one digit".to_string(),
            ));
        }
        Ok(())
    }

    fn argon2(&self) -> Result<Argon2<'_>, IdentityError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| IdentityError::unavailable("argon2_init", e.to_string()))
    }

    fn hash_password(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        Ok(self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::unavailable("hash_password", e.to_string()))?
            .to_string())
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, IdentityError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| IdentityError::unavailable("parse_password_hash", e.to_string()))?;
        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[async_trait]
impl IdentityProvider for DbIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        Self::check_password_policy(password)?;

        let existing = IdentityEntity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| IdentityError::unavailable("find_identity_by_email", e.to_string()))?;

        if let Some(existing) = existing {
            // Idempotent re-create: same credentials resolve to the same
            // identity, anything else is a conflict
            if self.verify_password(password, &existing.password_hash)? {
                return Ok(Identity::from(existing));
            }
            return Err(IdentityError::EmailTaken(email.to_string()));
        }

        let new_identity = identity::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password_hash: Set(self.hash_password(password)?),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = new_identity.insert(&self.db).await.map_err(|e| {
            // A concurrent signup for the same email wins the unique index
            if e.to_string().contains("UNIQUE") {
                IdentityError::EmailTaken(email.to_string())
            } else {
                IdentityError::unavailable("insert_identity", e.to_string())
            }
        })?;

        Ok(Identity::from(inserted))
    }

    async fn get_identity_by_id(&self, id: &str) -> Result<Option<Identity>, IdentityError> {
        let found = IdentityEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| IdentityError::unavailable("get_identity_by_id", e.to_string()))?;

        Ok(found.map(Identity::from))
    }
}

impl std::fmt::Debug for DbIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbIdentityProvider")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
