// Database entities (sea-orm models)
//
// Registry database: profile, role, jurisdiction, jurisdiction_admin.
// Identity database: identity (owned by the identity provider).
pub mod identity;
pub mod jurisdiction;
pub mod jurisdiction_admin;
pub mod profile;
pub mod role;
