//! AnalyticsAggregator - Batch statistics over scored assessments.
//!
//! Every snapshot is computed from scratch. Sums are kept in integers until
//! the final division, so the result does not depend on input order.

use serde::{Deserialize, Serialize};

use super::definition::Pillar;
use super::scoring::{QuestionResult, ScoredAssessment};
use super::thresholds::ScoreThresholds;
use crate::domain::foundation::{PillarId, QuestionId};

/// Aggregation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOptions {
    /// Count unanswered questions as gaps, alongside answers at the minimum.
    pub include_unanswered_in_gaps: bool,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            include_unanswered_in_gaps: true,
        }
    }
}

/// Number of assessments in one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: String,
    pub count: usize,
}

/// How often one question was a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapFrequency {
    pub question_id: QuestionId,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarStatistics {
    pub pillar_id: PillarId,
    pub average_score: f64,
    pub max_score: u32,
    /// `average_score` as a share of `max_score`, 0 to 100.
    pub average_percentage: f64,
    /// The question most often at its minimum; `None` when no gaps occurred.
    pub common_gap: Option<GapFrequency>,
    /// Gap counts for every question, in declaration order.
    pub gap_frequency: Vec<GapFrequency>,
}

/// Aggregate view over a batch of scored assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub assessment_count: usize,
    /// Count per level, weakest first, zero counts included.
    pub distribution: Vec<LevelCount>,
    pub pillars: Vec<PillarStatistics>,
    /// Share of assessments where every pillar has an answer, 0 to 1.
    pub completion_rate: f64,
    /// Mean seconds from first to last answer, over assessments with two or
    /// more answers.
    pub average_time_to_complete_secs: Option<f64>,
    pub average_total_score: f64,
}

impl AnalyticsSnapshot {
    /// Count for a level, 0 for unknown levels.
    pub fn count_for(&self, level: &str) -> usize {
        self.distribution
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn pillar(&self, pillar_id: &str) -> Option<&PillarStatistics> {
        self.pillars.iter().find(|p| p.pillar_id.as_str() == pillar_id)
    }
}

/// Analytics calculator.
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Aggregates a batch of scored assessments.
    ///
    /// Levels are re-derived from each total with the given thresholds, so a
    /// batch scored under an older table is reported under the current one.
    pub fn aggregate(
        scored: &[ScoredAssessment],
        pillars: &[Pillar],
        thresholds: &ScoreThresholds,
        options: &AnalyticsOptions,
    ) -> AnalyticsSnapshot {
        let count = scored.len();

        let mut distribution: Vec<LevelCount> = thresholds
            .levels()
            .map(|level| LevelCount {
                level: level.to_string(),
                count: 0,
            })
            .collect();
        for assessment in scored {
            let level = thresholds.classify(assessment.total_score);
            distribution[level.rank].count += 1;
        }

        let pillar_stats = pillars
            .iter()
            .map(|pillar| Self::pillar_statistics(pillar, scored, options))
            .collect();

        let completed = scored
            .iter()
            .filter(|s| {
                !pillars.is_empty()
                    && pillars.iter().all(|p| {
                        s.pillar_score(p.id.as_str())
                            .map(|ps| ps.has_answers())
                            .unwrap_or(false)
                    })
            })
            .count();

        let (span_total, span_count) = scored
            .iter()
            .filter_map(|s| s.answer_span)
            .filter(|span| span.answer_count >= 2)
            .fold((0.0_f64, 0_usize), |(total, n), span| {
                (total + span.duration_secs(), n + 1)
            });

        let total_score: u64 = scored.iter().map(|s| u64::from(s.total_score)).sum();

        tracing::debug!(
            assessments = count,
            completed,
            "Aggregated qualification analytics"
        );

        AnalyticsSnapshot {
            assessment_count: count,
            distribution,
            pillars: pillar_stats,
            completion_rate: ratio(completed as u64, count),
            average_time_to_complete_secs: (span_count > 0)
                .then(|| span_total / span_count as f64),
            average_total_score: ratio(total_score, count),
        }
    }

    fn pillar_statistics(
        pillar: &Pillar,
        scored: &[ScoredAssessment],
        options: &AnalyticsOptions,
    ) -> PillarStatistics {
        let score_sum: u64 = scored
            .iter()
            .filter_map(|s| s.pillar_score(pillar.id.as_str()))
            .map(|p| u64::from(p.score))
            .sum();
        let average_score = ratio(score_sum, scored.len());
        let average_percentage = if pillar.max_score == 0 {
            0.0
        } else {
            average_score * 100.0 / f64::from(pillar.max_score)
        };

        let gap_frequency: Vec<GapFrequency> = pillar
            .questions
            .iter()
            .map(|question| GapFrequency {
                question_id: question.id.clone(),
                occurrences: scored
                    .iter()
                    .filter(|s| is_gap(s.question_result(question.id.as_str()), options))
                    .count(),
            })
            .collect();

        // First strictly greater wins, so ties go to the earlier question.
        let mut common_gap: Option<&GapFrequency> = None;
        for gap in gap_frequency.iter().filter(|g| g.occurrences > 0) {
            if common_gap.map_or(true, |best| gap.occurrences > best.occurrences) {
                common_gap = Some(gap);
            }
        }

        PillarStatistics {
            pillar_id: pillar.id.clone(),
            average_score,
            max_score: pillar.max_score,
            average_percentage,
            common_gap: common_gap.cloned(),
            gap_frequency,
        }
    }
}

fn is_gap(result: Option<&QuestionResult>, options: &AnalyticsOptions) -> bool {
    match result {
        Some(r) if r.answered => r.is_at_minimum(),
        _ => options.include_unanswered_in_gaps,
    }
}

fn ratio(numerator: u64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::qualification::answer::Answer;
    use crate::domain::qualification::definition::{AnswerOption, Question, ThresholdSpec};
    use crate::domain::qualification::scoring::ScoringEngine;
    use std::collections::BTreeMap;

    fn question(id: &str) -> Question {
        Question::new(
            id,
            format!("{id}?"),
            vec![
                AnswerOption::new("No", "no", 0),
                AnswerOption::new("Partial", "partial", 5),
                AnswerOption::new("Yes", "yes", 10),
            ],
        )
    }

    fn pillars() -> Vec<Pillar> {
        vec![
            Pillar::new("metrics", "Metrics", vec![question("m1"), question("m2")]),
            Pillar::new("champion", "Champion", vec![question("c1")]),
        ]
    }

    fn thresholds() -> ScoreThresholds {
        let mut specs = BTreeMap::new();
        specs.insert("weak".to_string(), ThresholdSpec::up_to(9));
        specs.insert("moderate".to_string(), ThresholdSpec::range(10, 19));
        specs.insert("strong".to_string(), ThresholdSpec::at_least(20));
        ScoreThresholds::from_specs(&specs, 30).unwrap()
    }

    fn score(answers: &[(&str, &str, &str, i64)]) -> ScoredAssessment {
        let answers: Vec<_> = answers
            .iter()
            .map(|(p, q, v, t)| Answer::new(*p, *q, *v, Timestamp::from_unix_secs(*t)))
            .collect();
        ScoringEngine::score(&pillars(), &thresholds(), &answers)
    }

    fn batch() -> Vec<ScoredAssessment> {
        vec![
            score(&[
                ("metrics", "m1", "yes", 0),
                ("metrics", "m2", "yes", 100),
                ("champion", "c1", "yes", 300),
            ]),
            score(&[("metrics", "m1", "no", 0), ("champion", "c1", "partial", 60)]),
            score(&[("metrics", "m2", "no", 50)]),
        ]
    }

    #[test]
    fn distribution_includes_zero_counts() {
        let snapshot = AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &AnalyticsOptions::default());
        assert_eq!(snapshot.count_for("strong"), 1);
        assert_eq!(snapshot.count_for("weak"), 2);
        assert_eq!(snapshot.count_for("moderate"), 0);
        assert_eq!(snapshot.distribution.len(), 3);
        assert_eq!(snapshot.distribution[0].level, "weak");
    }

    #[test]
    fn pillar_averages() {
        let snapshot = AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &AnalyticsOptions::default());
        let metrics = snapshot.pillar("metrics").unwrap();
        assert!((metrics.average_score - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.max_score, 20);
        let champion = snapshot.pillar("champion").unwrap();
        assert!((champion.average_score - 5.0).abs() < 1e-9);
        assert!((champion.average_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn common_gap_counts_minimum_and_unanswered() {
        let snapshot = AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &AnalyticsOptions::default());
        let metrics = snapshot.pillar("metrics").unwrap();
        // m1: "no" once, unanswered once. m2: unanswered once, "no" once.
        assert_eq!(metrics.gap_frequency[0].occurrences, 2);
        assert_eq!(metrics.gap_frequency[1].occurrences, 2);
        let gap = metrics.common_gap.as_ref().unwrap();
        assert_eq!(gap.question_id.as_str(), "m1");
    }

    #[test]
    fn unanswered_can_be_excluded_from_gaps() {
        let options = AnalyticsOptions {
            include_unanswered_in_gaps: false,
        };
        let snapshot = AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &options);
        let champion = snapshot.pillar("champion").unwrap();
        assert!(champion.common_gap.is_none());
        assert_eq!(snapshot.pillar("metrics").unwrap().gap_frequency[0].occurrences, 1);
    }

    #[test]
    fn completion_and_time_to_complete() {
        let snapshot = AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &AnalyticsOptions::default());
        assert!((snapshot.completion_rate - 2.0 / 3.0).abs() < 1e-9);
        // Spans: 300s and 60s; the single-answer assessment is excluded.
        assert_eq!(snapshot.average_time_to_complete_secs, Some(180.0));
    }

    #[test]
    fn time_to_complete_keeps_sub_second_precision() {
        use chrono::{TimeZone, Utc};

        let at_millis = |ms: i64| {
            Timestamp::from_datetime(Utc.timestamp_millis_opt(ms).single().unwrap())
        };
        let answers = vec![
            Answer::new("metrics", "m1", "yes", at_millis(1_000)),
            Answer::new("champion", "c1", "yes", at_millis(2_500)),
        ];
        let scored = ScoringEngine::score(&pillars(), &thresholds(), &answers);
        let snapshot = AnalyticsAggregator::aggregate(
            &[scored],
            &pillars(),
            &thresholds(),
            &AnalyticsOptions::default(),
        );
        assert_eq!(snapshot.average_time_to_complete_secs, Some(1.5));
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let snapshot = AnalyticsAggregator::aggregate(&[], &pillars(), &thresholds(), &AnalyticsOptions::default());
        assert_eq!(snapshot.assessment_count, 0);
        assert_eq!(snapshot.completion_rate, 0.0);
        assert_eq!(snapshot.average_total_score, 0.0);
        assert!(snapshot.average_time_to_complete_secs.is_none());
        assert!(snapshot.distribution.iter().all(|c| c.count == 0));
        assert!(snapshot.pillars.iter().all(|p| p.common_gap.is_none()));
    }

    #[test]
    fn order_does_not_matter() {
        let mut reversed = batch();
        reversed.reverse();
        let options = AnalyticsOptions::default();
        assert_eq!(
            AnalyticsAggregator::aggregate(&batch(), &pillars(), &thresholds(), &options),
            AnalyticsAggregator::aggregate(&reversed, &pillars(), &thresholds(), &options)
        );
    }
}
