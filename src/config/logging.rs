//! Logging settings

use serde::Deserialize;

use super::SettingsValidationError;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `deal_qualification=debug`)
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingSettings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if self.level.trim().is_empty() {
            return Err(SettingsValidationError::EmptyLogLevel);
        }
        Ok(())
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_deserializes_lowercase() {
        let settings: LoggingSettings =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.level, "debug");
    }

    #[test]
    fn empty_level_is_invalid() {
        let settings = LoggingSettings {
            level: String::new(),
            format: LogFormat::Pretty,
        };
        assert_eq!(settings.validate(), Err(SettingsValidationError::EmptyLogLevel));
    }
}
