use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{provider} returned {status}: {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    ParseError { provider: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_) => ErrorCategory::Network,
            EnrichError::ProviderError { .. } => ErrorCategory::Provider,
            EnrichError::ConfigError { .. }
            | EnrichError::ConfigValidationError { .. }
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EnrichError::ValidationError { .. } => ErrorCategory::Input,
            EnrichError::SerializationError(_) | EnrichError::ParseError { .. } => {
                ErrorCategory::Data
            }
            EnrichError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 供應商錯誤在管線內會被隔離，只影響單一來源
            ErrorCategory::Provider | ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EnrichError::ApiError(_) => {
                "Check network connectivity and provider base URLs, then retry".to_string()
            }
            EnrichError::ProviderError { provider, status, .. } => match status {
                401 | 403 => format!("Check the API key configured for {}", provider),
                429 => format!("{} is rate limiting requests, wait before retrying", provider),
                _ => format!("{} is unavailable, the profile falls back to defaults", provider),
            },
            EnrichError::ConfigError { .. }
            | EnrichError::ConfigValidationError { .. }
            | EnrichError::InvalidConfigValueError { .. } => {
                "Review the configuration file and environment variables".to_string()
            }
            EnrichError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            EnrichError::ValidationError { .. } => {
                "Provide a non-empty name (max 100 characters) and an email like user@example.com"
                    .to_string()
            }
            EnrichError::SerializationError(_) | EnrichError::ParseError { .. } => {
                "The provider answered with an unexpected payload, retry later".to_string()
            }
            EnrichError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a data provider: {}", self),
            ErrorCategory::Provider => format!("A data provider rejected the request: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Invalid request: {}", self),
            ErrorCategory::Data => format!("Unexpected provider data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
