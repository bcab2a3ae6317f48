use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::errors::internal::{DatabaseError, RegistrationError};
use crate::types::db::jurisdiction_admin::{self, Entity as JurisdictionAdmin};
use crate::types::db::profile::{self, Entity as Profile};
use crate::types::internal::registration::{NewProfile, ProfileStatus};

/// ProfileStore owns all writes to profiles and admin-slot reservations.
///
/// The one-admin-per-jurisdiction invariant lives entirely inside
/// reserve_and_upsert: no other code path writes the reservation table, so
/// there is no read-then-write window for concurrent signups to slip
/// through.
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a profile by email (early duplicate check in the signup flow)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<profile::Model>, DatabaseError> {
        Profile::find()
            .filter(profile::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_profile_by_email", e))
    }

    /// Find a profile by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<profile::Model>, DatabaseError> {
        Profile::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_profile_by_id", e))
    }

    /// Advisory read: does a non-rejected admin profile hold this
    /// jurisdiction?
    ///
    /// UI pre-flight only. This read can be stale the moment it returns; the
    /// reservation inside reserve_and_upsert is the authoritative check.
    pub async fn jurisdiction_admin_status(&self, code: &str) -> Result<bool, DatabaseError> {
        let reservation = JurisdictionAdmin::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_jurisdiction_reservation", e))?;

        let Some(reservation) = reservation else {
            return Ok(false);
        };

        let holder = Profile::find_by_id(&reservation.profile_id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_reservation_holder", e))?;

        Ok(holder.is_some_and(|h| h.status != ProfileStatus::Rejected.as_str()))
    }

    /// Atomically reserve the jurisdiction admin slot (when requested) and
    /// upsert the profile row, in one transaction.
    ///
    /// Reservation rules, evaluated inside the transaction:
    /// - held by the same profile id: proceed (a retried signup must not
    ///   conflict with itself)
    /// - held by a rejected profile: reclaim the slot
    /// - held by anyone else: JurisdictionAlreadyAdministered
    /// - absent: insert; a unique violation from a concurrent racer is also
    ///   JurisdictionAlreadyAdministered
    ///
    /// The upsert is keyed by profile id: an existing row (from a prior
    /// partial attempt) is completed rather than duplicated, and no
    /// duplicate-key error ever reaches the caller.
    pub async fn reserve_and_upsert(
        &self,
        new_profile: NewProfile,
        reserve: Option<&str>,
    ) -> Result<profile::Model, RegistrationError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        if let Some(code) = reserve {
            self.reserve_slot(&txn, code, &new_profile.id).await?;
        }

        let model = self.upsert_profile(&txn, new_profile).await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        Ok(model)
    }

    async fn reserve_slot(
        &self,
        txn: &DatabaseTransaction,
        code: &str,
        profile_id: &str,
    ) -> Result<(), RegistrationError> {
        let existing = JurisdictionAdmin::find_by_id(code)
            .one(txn)
            .await
            .map_err(|e| DatabaseError::operation("find_jurisdiction_reservation", e))?;

        match existing {
            Some(held) if held.profile_id == profile_id => Ok(()),
            Some(held) => {
                let holder = Profile::find_by_id(&held.profile_id)
                    .one(txn)
                    .await
                    .map_err(|e| DatabaseError::operation("find_reservation_holder", e))?;

                // A missing or rejected holder releases the slot
                let reclaimable =
                    holder.is_none_or(|h| h.status == ProfileStatus::Rejected.as_str());
                if !reclaimable {
                    return Err(RegistrationError::JurisdictionAlreadyAdministered(
                        code.to_string(),
                    ));
                }

                let mut reservation: jurisdiction_admin::ActiveModel = held.into();
                reservation.profile_id = Set(profile_id.to_string());
                reservation.reserved_at = Set(Utc::now().timestamp());
                reservation
                    .update(txn)
                    .await
                    .map_err(|e| DatabaseError::operation("reclaim_jurisdiction_reservation", e))?;
                Ok(())
            }
            None => {
                let reservation = jurisdiction_admin::ActiveModel {
                    jurisdiction_code: Set(code.to_string()),
                    profile_id: Set(profile_id.to_string()),
                    reserved_at: Set(Utc::now().timestamp()),
                };

                reservation.insert(txn).await.map_err(|e| {
                    if e.to_string().contains("UNIQUE") {
                        RegistrationError::JurisdictionAlreadyAdministered(code.to_string())
                    } else {
                        RegistrationError::Store(DatabaseError::operation(
                            "insert_jurisdiction_reservation",
                            e,
                        ))
                    }
                })?;
                Ok(())
            }
        }
    }

    async fn upsert_profile(
        &self,
        txn: &DatabaseTransaction,
        new_profile: NewProfile,
    ) -> Result<profile::Model, RegistrationError> {
        let now = Utc::now().timestamp();

        let existing = Profile::find_by_id(&new_profile.id)
            .one(txn)
            .await
            .map_err(|e| DatabaseError::operation("find_profile_for_upsert", e))?;

        let model = match existing {
            Some(current) => {
                // Complete a prior partial attempt; status and created_at are
                // preserved so a retried signup cannot reset the approval
                // workflow
                let mut active: profile::ActiveModel = current.into();
                active.email = Set(new_profile.email);
                active.first_name = Set(new_profile.first_name);
                active.last_name = Set(new_profile.last_name);
                active.role_id = Set(new_profile.role_id);
                active.jurisdiction_code = Set(new_profile.jurisdiction_code);
                active.updated_at = Set(now);
                active
                    .update(txn)
                    .await
                    .map_err(|e| DatabaseError::operation("update_profile", e))?
            }
            None => {
                let active = profile::ActiveModel {
                    id: Set(new_profile.id),
                    email: Set(new_profile.email),
                    first_name: Set(new_profile.first_name),
                    last_name: Set(new_profile.last_name),
                    role_id: Set(new_profile.role_id),
                    jurisdiction_code: Set(new_profile.jurisdiction_code),
                    status: Set(new_profile.status.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active
                    .insert(txn)
                    .await
                    .map_err(|e| DatabaseError::operation("insert_profile", e))?
            }
        };

        Ok(model)
    }
}
