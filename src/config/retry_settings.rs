use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;
use crate::services::visibility::RetryPolicy;

/// Settings for the identity-visibility retry loop
///
/// Propagation delay between the identity provider and the registry's read
/// path is a distribution, not a constant, so every knob here is
/// operator-tunable rather than hard-coded.
#[derive(Clone)]
pub struct RetrySettings {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    jitter: Option<f64>,
}

impl RetrySettings {
    /// Load retry settings from the given environment provider
    ///
    /// # Errors
    /// Returns `ApplicationError` when a value fails to parse or violates a
    /// sanity bound.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let max_attempts = parse_u32(env_provider.var("VISIBILITY_MAX_ATTEMPTS"), 8, "VISIBILITY_MAX_ATTEMPTS")?;
        if max_attempts == 0 {
            return Err(ApplicationError::invalid(
                "VISIBILITY_MAX_ATTEMPTS",
                "must be at least 1".to_string(),
            ));
        }

        let initial_delay_ms = parse_u64(
            env_provider.var("VISIBILITY_INITIAL_DELAY_MS"),
            50,
            "VISIBILITY_INITIAL_DELAY_MS",
        )?;

        let backoff_multiplier = parse_f64(
            env_provider.var("VISIBILITY_BACKOFF_MULTIPLIER"),
            2.0,
            "VISIBILITY_BACKOFF_MULTIPLIER",
        )?;
        if backoff_multiplier < 1.0 {
            return Err(ApplicationError::invalid(
                "VISIBILITY_BACKOFF_MULTIPLIER",
                "must be at least 1.0".to_string(),
            ));
        }

        let max_delay_ms = parse_u64(
            env_provider.var("VISIBILITY_MAX_DELAY_MS"),
            2000,
            "VISIBILITY_MAX_DELAY_MS",
        )?;
        if max_delay_ms < initial_delay_ms {
            return Err(ApplicationError::invalid(
                "VISIBILITY_MAX_DELAY_MS",
                "must not be smaller than VISIBILITY_INITIAL_DELAY_MS".to_string(),
            ));
        }

        let jitter = parse_f64(env_provider.var("VISIBILITY_JITTER"), 0.2, "VISIBILITY_JITTER")?;
        if !(0.0..1.0).contains(&jitter) {
            return Err(ApplicationError::invalid(
                "VISIBILITY_JITTER",
                "must be in [0.0, 1.0)".to_string(),
            ));
        }

        Ok(Self {
            max_attempts,
            initial_delay: Duration::from_millis(initial_delay_ms),
            backoff_multiplier,
            max_delay: Duration::from_millis(max_delay_ms),
            jitter: (jitter > 0.0).then_some(jitter),
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Build the runtime retry policy from these settings
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            backoff_multiplier: self.backoff_multiplier,
            max_delay: self.max_delay,
            jitter: self.jitter,
        }
    }
}

fn parse_u32(value: Option<String>, default: u32, setting_name: &str) -> Result<u32, ApplicationError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApplicationError::invalid(setting_name, format!("expected an integer, got {:?}", raw))),
    }
}

fn parse_u64(value: Option<String>, default: u64, setting_name: &str) -> Result<u64, ApplicationError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApplicationError::invalid(setting_name, format!("expected an integer, got {:?}", raw))),
    }
}

fn parse_f64(value: Option<String>, default: f64, setting_name: &str) -> Result<f64, ApplicationError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApplicationError::invalid(setting_name, format!("expected a number, got {:?}", raw))),
    }
}

impl fmt::Debug for RetrySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySettings")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use std::collections::HashMap;

    fn create_test_env(vars: HashMap<String, String>) -> Arc<MockEnvironment> {
        Arc::new(MockEnvironment::new(vars))
    }

    #[test]
    fn test_retry_settings_defaults() {
        let settings = RetrySettings::from_env_provider(create_test_env(HashMap::new())).unwrap();
        let policy = settings.policy();

        assert_eq!(policy.max_attempts, 8);
        assert_eq!(policy.initial_delay, Duration::from_millis(50));
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert_eq!(policy.max_delay, Duration::from_millis(2000));
        assert_eq!(policy.jitter, Some(0.2));
    }

    #[test]
    fn test_retry_settings_overrides() {
        let vars = HashMap::from([
            ("VISIBILITY_MAX_ATTEMPTS".to_string(), "3".to_string()),
            ("VISIBILITY_INITIAL_DELAY_MS".to_string(), "100".to_string()),
            ("VISIBILITY_BACKOFF_MULTIPLIER".to_string(), "1.5".to_string()),
            ("VISIBILITY_MAX_DELAY_MS".to_string(), "400".to_string()),
            ("VISIBILITY_JITTER".to_string(), "0".to_string()),
        ]);

        let policy = RetrySettings::from_env_provider(create_test_env(vars))
            .unwrap()
            .policy();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.backoff_multiplier, 1.5);
        assert_eq!(policy.max_delay, Duration::from_millis(400));
        // Zero jitter disables it
        assert_eq!(policy.jitter, None);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let vars = HashMap::from([("VISIBILITY_MAX_ATTEMPTS".to_string(), "0".to_string())]);

        let result = RetrySettings::from_env_provider(create_test_env(vars));

        assert!(result.is_err());
    }

    #[test]
    fn test_sub_unit_multiplier_rejected() {
        let vars = HashMap::from([("VISIBILITY_BACKOFF_MULTIPLIER".to_string(), "0.5".to_string())]);

        let result = RetrySettings::from_env_provider(create_test_env(vars));

        assert!(result.is_err());
    }

    #[test]
    fn test_max_delay_below_initial_rejected() {
        let vars = HashMap::from([
            ("VISIBILITY_INITIAL_DELAY_MS".to_string(), "500".to_string()),
            ("VISIBILITY_MAX_DELAY_MS".to_string(), "100".to_string()),
        ]);

        let result = RetrySettings::from_env_provider(create_test_env(vars));

        assert!(result.is_err());
    }

    #[test]
    fn test_jitter_out_of_range_rejected() {
        for bad in ["1.0", "1.5", "-0.1"] {
            let vars = HashMap::from([("VISIBILITY_JITTER".to_string(), bad.to_string())]);

            let result = RetrySettings::from_env_provider(create_test_env(vars));

            assert!(result.is_err(), "expected error for jitter {}", bad);
        }
    }
}
