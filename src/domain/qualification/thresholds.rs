//! Score thresholds - a contiguous partition of `[0, max_score]` into named
//! levels, ordered from weakest to strongest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::definition::ThresholdSpec;
use crate::domain::foundation::{ConfigError, ConfigErrors};

/// One named score band, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub level: String,
    pub min: u32,
    pub max: u32,
}

impl ThresholdBand {
    pub fn contains(&self, score: u32) -> bool {
        self.min <= score && score <= self.max
    }
}

/// The level a score falls in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelClassification {
    pub name: String,
    /// 0 for the weakest level.
    pub rank: usize,
    pub is_highest: bool,
}

/// Validated threshold table.
///
/// Construction guarantees the bands start at 0, have no gaps or overlaps,
/// and reach `max_score`, so every score in range has exactly one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreThresholds {
    bands: Vec<ThresholdBand>,
    max_score: u32,
}

impl ScoreThresholds {
    /// Builds and checks a threshold table.
    pub fn from_specs(
        specs: &BTreeMap<String, ThresholdSpec>,
        max_score: u32,
    ) -> Result<Self, ConfigErrors> {
        ConfigErrors::into_result(Self::check(specs, max_score), ())?;

        let mut bands: Vec<ThresholdBand> = specs
            .iter()
            .map(|(level, spec)| ThresholdBand {
                level: level.clone(),
                min: spec.min,
                max: spec.max.unwrap_or(max_score),
            })
            .collect();
        bands.sort_by_key(|b| (b.min, b.max));

        Ok(Self { bands, max_score })
    }

    /// Collects every problem with a threshold table.
    pub(crate) fn check(specs: &BTreeMap<String, ThresholdSpec>, max_score: u32) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if specs.is_empty() {
            errors.push(ConfigError::MissingThresholds);
            return errors;
        }

        let mut bands: Vec<(&str, u32, u32)> = Vec::with_capacity(specs.len());
        for (level, spec) in specs {
            let max = spec.max.unwrap_or(max_score);
            if spec.min > max {
                errors.push(ConfigError::InvalidThresholdRange {
                    level: level.clone(),
                    min: spec.min,
                    max,
                });
            } else {
                bands.push((level.as_str(), spec.min, max));
            }
        }
        if !errors.is_empty() {
            return errors;
        }
        bands.sort_by_key(|&(_, min, max)| (min, max));

        let (_, first_min, _) = bands[0];
        if first_min > 0 {
            errors.push(ConfigError::ThresholdGap {
                from: 0,
                to: first_min - 1,
            });
        }

        for pair in bands.windows(2) {
            let (prev_level, _, prev_max) = pair[0];
            let (next_level, next_min, _) = pair[1];
            if next_min <= prev_max {
                errors.push(ConfigError::ThresholdOverlap {
                    first: prev_level.to_string(),
                    second: next_level.to_string(),
                });
            } else if next_min > prev_max + 1 {
                errors.push(ConfigError::ThresholdGap {
                    from: prev_max + 1,
                    to: next_min - 1,
                });
            }
        }

        let covered = bands.iter().map(|&(_, _, max)| max).max().unwrap_or(0);
        if covered < max_score {
            errors.push(ConfigError::ThresholdNotExhaustive { max_score, covered });
        }

        errors
    }

    /// Classifies a total score.
    ///
    /// Scores above `max_score` land in the highest band, so classification
    /// is monotone over all of `u32`.
    pub fn classify(&self, score: u32) -> LevelClassification {
        let rank = self
            .bands
            .iter()
            .rposition(|b| b.min <= score)
            .unwrap_or(0);
        LevelClassification {
            name: self.bands[rank].level.clone(),
            rank,
            is_highest: rank + 1 == self.bands.len(),
        }
    }

    /// Bands from weakest to strongest.
    pub fn bands(&self) -> &[ThresholdBand] {
        &self.bands
    }

    /// Level names from weakest to strongest.
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.bands.iter().map(|b| b.level.as_str())
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }
}
