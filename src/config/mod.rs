mod bootstrap_settings;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod retry_settings;

pub use bootstrap_settings::BootstrapSettings;
pub use database::DatabaseConnections;
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::init_logging;
pub use retry_settings::RetrySettings;
