use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("Structure nested deeper than {depth} levels (probably self-referential)")]
    CyclicStructure { depth: usize },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{component} used after destroy()")]
    Destroyed { component: &'static str },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 錯誤分類，方便呼叫端決定如何回報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structure,
    Usage,
    Configuration,
    System,
}

impl HelperError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        HelperError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HelperError::CyclicStructure { .. } => ErrorCategory::Structure,
            HelperError::InvalidArgument { .. } | HelperError::Destroyed { .. } => {
                ErrorCategory::Usage
            }
            HelperError::ConfigValidationError { .. }
            | HelperError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            HelperError::IoError(_) | HelperError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            HelperError::CyclicStructure { .. } => {
                "The data contains a reference cycle or is nested too deeply".to_string()
            }
            HelperError::InvalidArgument { message } => format!("Invalid input: {}", message),
            HelperError::Destroyed { component } => {
                format!("The {} has already been destroyed", component)
            }
            HelperError::ConfigValidationError { field, .. }
            | HelperError::InvalidConfigValueError { field, .. } => {
                format!("Please check the '{}' setting in your configuration", field)
            }
            HelperError::IoError(e) => format!("File operation failed: {}", e),
            HelperError::SerializationError(e) => format!("Could not convert data: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            HelperError::CyclicStructure { depth: 3 }.category(),
            ErrorCategory::Structure
        );
        assert_eq!(
            HelperError::Destroyed {
                component: "Debounce"
            }
            .category(),
            ErrorCategory::Usage
        );
        assert_eq!(
            HelperError::InvalidConfigValueError {
                field: "timing.time_slice_ms".to_string(),
                value: "0".to_string(),
                reason: "too small".to_string(),
            }
            .category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_display_messages() {
        let err = HelperError::invalid_argument("target must be an object");
        assert_eq!(err.to_string(), "Invalid argument: target must be an object");
        assert!(err.user_friendly_message().contains("target must be an object"));

        let err = HelperError::Destroyed {
            component: "Throttle",
        };
        assert_eq!(err.to_string(), "Throttle used after destroy()");
    }
}
