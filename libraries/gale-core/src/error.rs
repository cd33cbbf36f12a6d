/// Core error types for Gale
use thiserror::Error;

/// Result type alias using `GaleError`
pub type Result<T> = std::result::Result<T, GaleError>;

/// Core error type for Gale
#[derive(Error, Debug)]
pub enum GaleError {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A collaborator (playlist storage, settings host) rejected an operation
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        /// Which collaborator failed
        collaborator: String,
        /// What went wrong
        message: String,
    },
}

impl GaleError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a collaborator error
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for GaleError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
