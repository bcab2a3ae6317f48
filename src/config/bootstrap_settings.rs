use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

const MIN_PEPPER_LENGTH: usize = 16;

/// Bootstrap settings for infrastructure configuration
///
/// Loaded once at startup, before any store or provider is constructed.
pub struct BootstrapSettings {
    registry_database_url: String,
    identity_database_url: String,
    server_host: String,
    server_port: u16,
    identity_password_pepper: String,
    registration_deadline: Option<Duration>,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    ///
    /// # Errors
    /// Returns `ApplicationError` when a required setting is absent or a
    /// value fails validation.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let registry_database_url = non_empty(
            env_provider.var("DATABASE_URL"),
            "sqlite://registry.db?mode=rwc",
            "DATABASE_URL",
        )?;

        let identity_database_url = non_empty(
            env_provider.var("IDENTITY_DATABASE_URL"),
            "sqlite://identity.db?mode=rwc",
            "IDENTITY_DATABASE_URL",
        )?;

        let server_host = non_empty(env_provider.var("HOST"), "0.0.0.0", "HOST")?;

        let server_port = parse_port(env_provider.var("PORT"), 3000)?;

        // The pepper has no default: it peppers every stored credential hash
        let identity_password_pepper = env_provider
            .var("IDENTITY_PASSWORD_PEPPER")
            .ok_or_else(|| ApplicationError::missing("IDENTITY_PASSWORD_PEPPER"))?;
        if identity_password_pepper.len() < MIN_PEPPER_LENGTH {
            return Err(ApplicationError::invalid(
                "IDENTITY_PASSWORD_PEPPER",
                format!("must be at least {} characters long", MIN_PEPPER_LENGTH),
            ));
        }

        let registration_deadline = parse_deadline(env_provider.var("REGISTRATION_DEADLINE_MS"))?;

        Ok(Self {
            registry_database_url,
            identity_database_url,
            server_host,
            server_port,
            identity_password_pepper,
            registration_deadline,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn registry_database_url(&self) -> &str {
        &self.registry_database_url
    }

    pub fn identity_database_url(&self) -> &str {
        &self.identity_database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn identity_password_pepper(&self) -> &str {
        &self.identity_password_pepper
    }

    /// Per-request deadline for the signup workflow; None disables it
    pub fn registration_deadline(&self) -> Option<Duration> {
        self.registration_deadline
    }
}

fn non_empty(
    value: Option<String>,
    default: &str,
    setting_name: &str,
) -> Result<String, ApplicationError> {
    let value = value.unwrap_or_else(|| default.to_string());
    if value.is_empty() {
        return Err(ApplicationError::invalid(
            setting_name,
            "cannot be empty".to_string(),
        ));
    }
    Ok(value)
}

fn parse_port(value: Option<String>, default: u16) -> Result<u16, ApplicationError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
            ApplicationError::invalid(
                "PORT",
                format!("expected port number between 1 and 65535, got {:?}", raw),
            )
        }),
    }
}

fn parse_deadline(value: Option<String>) -> Result<Option<Duration>, ApplicationError> {
    match value {
        None => Ok(Some(Duration::from_millis(30_000))),
        Some(raw) => match raw.parse::<u64>() {
            // 0 disables the deadline entirely
            Ok(0) => Ok(None),
            Ok(ms) => Ok(Some(Duration::from_millis(ms))),
            Err(_) => Err(ApplicationError::invalid(
                "REGISTRATION_DEADLINE_MS",
                format!("expected milliseconds as an integer, got {:?}", raw),
            )),
        },
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("registry_database_url", &self.registry_database_url)
            .field("identity_database_url", &self.identity_database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("identity_password_pepper", &"<redacted>")
            .field("registration_deadline", &self.registration_deadline)
            .finish()
    }
}
