//! Application layer - Query handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    AggregateAssessmentsHandler, AggregateAssessmentsQuery, ScoreAssessmentHandler,
    ScoreAssessmentQuery,
};
