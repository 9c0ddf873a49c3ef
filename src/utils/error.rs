use thiserror::Error;

/// 表單欄位驗證錯誤，Display 即為顯示給使用者的訊息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid name")]
    NameTooShort,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please enter a valid email or phone number")]
    InvalidIdentity,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Please accept the Terms and Conditions")]
    TermsNotAccepted,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Please select both area and plan")]
    InvalidSelection,

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Remote call failed: {site}")]
    RemoteCallFailure { site: String },

    #[error("Persistence error on '{key}': {message}")]
    Persistence { key: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn persistence(key: &str, message: impl ToString) -> Self {
        AppError::Persistence {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_)
            | AppError::InvalidSelection
            | AppError::UnknownZone(_)
            | AppError::UnknownPlan(_) => ErrorSeverity::Low,
            AppError::RemoteCallFailure { .. } | AppError::Http(_) => ErrorSeverity::Medium,
            AppError::Persistence { .. } | AppError::Io(_) | AppError::Serialization(_) => {
                ErrorSeverity::High
            }
            AppError::Config { .. } | AppError::InvalidConfigValue { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::InvalidSelection => self.to_string(),
            AppError::UnknownZone(id) => format!("No service area with id '{}'", id),
            AppError::UnknownPlan(id) => format!("No plan with id '{}'", id),
            AppError::RemoteCallFailure { .. } | AppError::Http(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Persistence { .. } | AppError::Io(_) | AppError::Serialization(_) => {
                "Could not save your data on this device.".to_string()
            }
            AppError::Config { .. } | AppError::InvalidConfigValue { .. } => {
                format!("Invalid configuration: {}", self)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_user_facing() {
        let err = AppError::from(ValidationError::NameTooShort);
        assert_eq!(err.user_message(), "Please enter a valid name");
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        let remote = AppError::RemoteCallFailure {
            site: "auth".to_string(),
        };
        let config = AppError::Config {
            message: "bad".to_string(),
        };
        assert!(remote.severity() < config.severity());
    }
}
