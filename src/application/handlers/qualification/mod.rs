//! Qualification query handlers.

mod aggregate_assessments;
mod score_assessment;

pub use aggregate_assessments::{AggregateAssessmentsHandler, AggregateAssessmentsQuery};
pub use score_assessment::{ScoreAssessmentHandler, ScoreAssessmentQuery};
