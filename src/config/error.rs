//! Configuration errors.

use thiserror::Error;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: values are out of range (e.g. zero epochs, non-positive learning rate).
///   *Recovery*: fix the values so that `validate()` passes.
/// - **EnvVar**: an environment variable could not be read (e.g. invalid Unicode).
/// - **Parse**: an environment variable was set but could not be parsed into the expected
///   type (e.g. `NODEGRAD_EPOCHS=abc`). Unset it to fall back to the default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("config validation: {0}")]
    Validation(String),

    /// Failed to read an environment variable.
    #[error("env var {key}: {message}")]
    EnvVar {
        /// The full environment variable name that was read.
        key: String,
        /// Underlying cause (e.g. not Unicode).
        message: String,
    },

    /// Environment variable was set but could not be parsed.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        /// The full environment variable name.
        key: String,
        /// The raw value that failed to parse.
        value: String,
        /// Parse failure reason.
        message: String,
    },
}

impl ConfigError {
    /// Returns a short message suitable for logging or user display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } | ConfigError::Parse { message, .. } => message,
        }
    }
}
