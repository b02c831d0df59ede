//! ScoreAssessmentHandler - Query handler for scoring answers with coaching.
//!
//! Results are memoized by a fingerprint of the model, coaching policy, and
//! answers, so a cache entry can never outlive the inputs that produced it.

use std::sync::Arc;

use crate::domain::foundation::AssessmentId;
use crate::domain::qualification::{Answer, QualificationEngine, QualificationReport};
use crate::ports::{get_or_compute, InputFingerprint, ScoreCache, ScoreCacheError};

/// Query to score one set of answers.
#[derive(Debug, Clone)]
pub struct ScoreAssessmentQuery {
    /// Carried onto the result when present.
    pub assessment_id: Option<AssessmentId>,
    pub answers: Vec<Answer>,
}

/// Handler for scoring queries.
pub struct ScoreAssessmentHandler {
    engine: Arc<QualificationEngine>,
    cache: Arc<dyn ScoreCache<QualificationReport>>,
}

impl ScoreAssessmentHandler {
    pub fn new(
        engine: Arc<QualificationEngine>,
        cache: Arc<dyn ScoreCache<QualificationReport>>,
    ) -> Self {
        Self { engine, cache }
    }

    pub fn handle(&self, query: ScoreAssessmentQuery) -> Result<QualificationReport, ScoreCacheError> {
        let key = InputFingerprint::of(&(
            self.engine.model().config(),
            self.engine.policy(),
            &query.answers,
        ))?;

        let mut report = get_or_compute(self.cache.as_ref(), key, || {
            self.engine.score_and_recommend(&query.answers)
        });
        report.scored.assessment_id = query.assessment_id;
        Ok(report)
    }
}
