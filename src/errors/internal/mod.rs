// Internal error types for store, provider, and coordinator operations.
//
// Not exposed via API - endpoints must convert to the ApiResponse enums in
// errors::api, which log internal detail and surface stable codes only.
pub mod database;
pub mod identity;
pub mod registration;

pub use database::DatabaseError;
pub use identity::IdentityError;
pub use registration::{FieldViolation, RegistrationError};
