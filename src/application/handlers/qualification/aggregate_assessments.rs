//! AggregateAssessmentsHandler - Query handler for batch analytics.

use std::sync::Arc;

use crate::domain::qualification::{AnalyticsSnapshot, QualificationEngine, ScoredAssessment};
use crate::ports::{get_or_compute, InputFingerprint, ScoreCache, ScoreCacheError};

/// Query to aggregate a batch of scored assessments.
#[derive(Debug, Clone)]
pub struct AggregateAssessmentsQuery {
    pub scored: Vec<ScoredAssessment>,
}

/// Handler for analytics queries, memoized like scoring.
pub struct AggregateAssessmentsHandler {
    engine: Arc<QualificationEngine>,
    cache: Arc<dyn ScoreCache<AnalyticsSnapshot>>,
}

impl AggregateAssessmentsHandler {
    pub fn new(
        engine: Arc<QualificationEngine>,
        cache: Arc<dyn ScoreCache<AnalyticsSnapshot>>,
    ) -> Self {
        Self { engine, cache }
    }

    pub fn handle(
        &self,
        query: AggregateAssessmentsQuery,
    ) -> Result<AnalyticsSnapshot, ScoreCacheError> {
        let key = InputFingerprint::of(&(
            self.engine.model().config(),
            self.engine.analytics_options(),
            &query.scored,
        ))?;

        Ok(get_or_compute(self.cache.as_ref(), key, || {
            self.engine.aggregate(&query.scored)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryScoreCache;
    use crate::domain::foundation::Timestamp;
    use crate::domain::qualification::{Answer, QualificationModel};

    #[test]
    fn aggregates_and_memoizes() {
        let engine = Arc::new(QualificationEngine::new(QualificationModel::meddpicc().unwrap()));
        let cache = Arc::new(InMemoryScoreCache::<AnalyticsSnapshot>::new());
        let handler = AggregateAssessmentsHandler::new(engine.clone(), cache.clone());

        let scored = vec![
            engine.score(&[]),
            engine.score(&[Answer::new("metrics", "metrics_quantified", "yes", Timestamp::from_unix_secs(5))]),
        ];
        let query = AggregateAssessmentsQuery { scored };

        let first = handler.handle(query.clone()).unwrap();
        let second = handler.handle(query).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.assessment_count, 2);
        assert_eq!(first.count_for("weak"), 2);
        assert_eq!(cache.len(), 1);
    }
}
