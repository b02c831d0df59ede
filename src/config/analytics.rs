//! Analytics settings

use serde::Deserialize;

use crate::domain::qualification::AnalyticsOptions;

/// Switches for batch analytics
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// Count unanswered questions as gaps
    #[serde(default = "default_include_unanswered_in_gaps")]
    pub include_unanswered_in_gaps: bool,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            include_unanswered_in_gaps: default_include_unanswered_in_gaps(),
        }
    }
}

impl AnalyticsSettings {
    pub fn options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            include_unanswered_in_gaps: self.include_unanswered_in_gaps,
        }
    }
}

fn default_include_unanswered_in_gaps() -> bool {
    true
}
