//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No backing file path has been configured
    #[error("User store is not configured: no users file path set")]
    NotConfigured,

    /// Reading or writing the backing file failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A required argument is empty or cannot be represented in the file
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether it is expected behavior (caller input, disabled store), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotConfigured | Self::InvalidArgument(_) => true,
            Self::StorageUnavailable(_) | Self::ConfigError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
