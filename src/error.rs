//! Centralized error types for synctable.
//!
//! Grid edits themselves cannot fail: unknown keys and invalid input are
//! ignored. The errors here come from the edges, loading the schema and the
//! configuration and driving the terminal.

use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::SchemaError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The table schema could not be loaded.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// The terminal could not be put into (or driven in) raw mode.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check it is readable.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Schema(e) => match e {
                SchemaError::DuplicateKey(key) => {
                    format!("Column '{}' is defined more than once.", key)
                }
                SchemaError::EmptyKey(label) => {
                    format!("Column '{}' needs a non-empty key.", label)
                }
                SchemaError::Read(_) => {
                    "Could not read the schema file. Please check the path.".to_string()
                }
                SchemaError::Parse(_) => {
                    "Schema file is invalid. Please check the column definitions.".to_string()
                }
                other => format!("Invalid schema: {}", other),
            },
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
        }
    }

    /// Check if this error prevents the application from starting.
    ///
    /// Non-critical configuration errors fall back to default settings.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Schema(_) | AppError::Terminal(_) | AppError::Config(ConfigError::ParseError(_))
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Schema(SchemaError::Read(_)) => {
                Some("Pass an existing file with '--schema', or omit it to use the demo tables.")
            }
            AppError::Schema(_) => Some("See demos/schema.toml for a working schema."),
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix or remove config.toml; defaults are used when it is missing.")
            }
            AppError::Terminal(_) => Some("Run synctable in an interactive terminal."),
            AppError::Config(_) => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
