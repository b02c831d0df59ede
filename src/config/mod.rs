//! Engine settings module
//!
//! This module provides type-safe settings loading from environment variables
//! using the `config` and `dotenvy` crates. Settings are loaded with the
//! `DEAL_QUALIFICATION` prefix and nested values use double underscores as
//! separators. Every value has a default, so an empty environment is valid.
//!
//! # Example
//!
//! ```no_run
//! use deal_qualification::config::EngineSettings;
//!
//! let settings = EngineSettings::load().expect("Failed to load settings");
//! settings.validate().expect("Invalid settings");
//!
//! println!("Weak pillar threshold: {}%", settings.coaching.weak_pillar_threshold);
//! ```

mod analytics;
mod coaching;
mod error;
mod logging;

pub use analytics::AnalyticsSettings;
pub use coaching::CoachingSettings;
pub use error::{SettingsError, SettingsValidationError};
pub use logging::{LogFormat, LoggingSettings};

use serde::Deserialize;
use std::path::Path;

use crate::domain::qualification::{QualificationEngine, QualificationModel};

const ENV_PREFIX: &str = "DEAL_QUALIFICATION";

/// Root engine settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// Coaching recommendation tunables
    #[serde(default)]
    pub coaching: CoachingSettings,

    /// Batch analytics switches
    #[serde(default)]
    pub analytics: AnalyticsSettings,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl EngineSettings {
    /// Load settings from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DEAL_QUALIFICATION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `DEAL_QUALIFICATION__COACHING__WEAK_PILLAR_THRESHOLD=40` -> `coaching.weak_pillar_threshold = 40`
    /// - `DEAL_QUALIFICATION__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Load settings from a TOML, YAML, or JSON file, with environment
    /// variables layered on top.
    ///
    /// The format is chosen from the file extension.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    fn environment() -> config::Environment {
        config::Environment::default()
            .prefix(ENV_PREFIX)
            .separator("__")
    }

    /// Validate all settings values
    ///
    /// # Errors
    ///
    /// Returns `SettingsValidationError` for the first invalid value.
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        self.coaching.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds an engine for `model` with these settings applied.
    pub fn engine_for(&self, model: QualificationModel) -> QualificationEngine {
        QualificationEngine::new(model)
            .with_policy(self.coaching.policy())
            .with_analytics_options(self.analytics.options())
    }
}
