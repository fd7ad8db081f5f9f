use thiserror::Error;

/// Unified error type for unicorn operations
#[derive(Error, Debug)]
pub enum UnicornError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Missing credential input: {0}")]
    MissingCredentialInput(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unknown categorization '{name}'. Known categorizations: {}", .known.join(", "))]
    UnknownCategorization { name: String, known: Vec<String> },

    #[error(
        "Unknown {categorization} value '{value}'. Valid values: {}",
        .known.join(", ")
    )]
    UnknownCategorizationValue {
        categorization: String,
        value: String,
        known: Vec<String>,
    },

    #[error("Duplicate {categorization} value '{value}'")]
    DuplicateCategorizationValue {
        categorization: String,
        value: String,
    },

    #[error("Configuration error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    #[error("Not an issue branch: {0}")]
    NotAnIssueBranch(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Tracker request failed: {0}")]
    Tracker(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Event payload error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in unicorn
pub type Result<T> = std::result::Result<T, UnicornError>;

impl UnicornError {
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        UnicornError::MissingParameter(name.into())
    }

    pub fn missing_input(name: impl Into<String>) -> Self {
        UnicornError::MissingCredentialInput(name.into())
    }

    /// Create a configuration parse error for the document at `path`
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        UnicornError::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        UnicornError::Repository(msg.into())
    }

    pub fn tracker(msg: impl Into<String>) -> Self {
        UnicornError::Tracker(msg.into())
    }

    /// Whether the tracker rejected the request because of the credentials used
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            UnicornError::Unauthorized(_) | UnicornError::InvalidCredentials(_)
        )
    }
}
