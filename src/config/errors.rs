use thiserror::Error;

/// Errors raised while loading application settings
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Missing required setting: {setting_name}")]
    MissingSetting { setting_name: String },

    #[error("Invalid setting {setting_name}: {reason}")]
    InvalidSetting {
        setting_name: String,
        reason: String,
    },
}

impl ApplicationError {
    pub fn missing(setting_name: &str) -> Self {
        ApplicationError::MissingSetting {
            setting_name: setting_name.to_string(),
        }
    }

    pub fn invalid(setting_name: &str, reason: String) -> Self {
        ApplicationError::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason,
        }
    }
}
