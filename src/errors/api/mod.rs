// API error types - ApiResponse enums returned by endpoints
pub mod jurisdiction;
pub mod signup;

pub use jurisdiction::JurisdictionError;
pub use signup::SignupError;
