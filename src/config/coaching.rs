//! Coaching settings

use serde::Deserialize;

use super::SettingsValidationError;
use crate::domain::foundation::Percentage;
use crate::domain::qualification::{CoachingPolicy, DEFAULT_FALLBACK_TEXT};

/// Tunables for coaching recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct CoachingSettings {
    /// Pillars scoring below this percentage of their max are flagged
    #[serde(default = "default_weak_pillar_threshold")]
    pub weak_pillar_threshold: u8,

    /// Text of the generic recommendation
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,

    /// Cap on action items per recommendation
    #[serde(default = "default_max_action_items")]
    pub max_action_items: usize,
}

impl Default for CoachingSettings {
    fn default() -> Self {
        Self {
            weak_pillar_threshold: default_weak_pillar_threshold(),
            fallback_text: default_fallback_text(),
            max_action_items: default_max_action_items(),
        }
    }
}

impl CoachingSettings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        Percentage::try_new(self.weak_pillar_threshold).map_err(|_| {
            SettingsValidationError::InvalidWeakPillarThreshold(self.weak_pillar_threshold)
        })?;
        if self.max_action_items == 0 {
            return Err(SettingsValidationError::ZeroActionItems);
        }
        if self.fallback_text.trim().is_empty() {
            return Err(SettingsValidationError::EmptyFallbackText);
        }
        Ok(())
    }

    /// Builds the domain policy these settings describe.
    pub fn policy(&self) -> CoachingPolicy {
        CoachingPolicy {
            weak_pillar_threshold: Percentage::new(self.weak_pillar_threshold),
            fallback_text: self.fallback_text.clone(),
            max_action_items: self.max_action_items,
        }
    }
}

fn default_weak_pillar_threshold() -> u8 {
    50
}

fn default_fallback_text() -> String {
    DEFAULT_FALLBACK_TEXT.to_string()
}

fn default_max_action_items() -> usize {
    5
}
