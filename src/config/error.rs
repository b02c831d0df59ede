//! Settings error types

use thiserror::Error;

/// Errors that can occur during settings loading
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] SettingsValidationError),
}

/// Errors that can occur during settings validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsValidationError {
    #[error("Log level must not be empty")]
    EmptyLogLevel,

    #[error("Weak pillar threshold must be at most 100, got {0}")]
    InvalidWeakPillarThreshold(u8),

    #[error("max_action_items must be at least 1")]
    ZeroActionItems,

    #[error("Fallback coaching text must not be empty")]
    EmptyFallbackText,
}
