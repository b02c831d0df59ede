//! Query handlers, grouped by domain area.

pub mod qualification;

pub use qualification::{
    AggregateAssessmentsHandler, AggregateAssessmentsQuery, ScoreAssessmentHandler,
    ScoreAssessmentQuery,
};
