//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the qualification domain.

mod errors;
mod ids;
mod percentage;
mod priority;
mod timestamp;

pub use errors::{ConfigError, ConfigErrors, ErrorCode, ValueError};
pub use ids::{AssessmentId, PillarId, QuestionId};
pub use percentage::Percentage;
pub use priority::Priority;
pub use timestamp::Timestamp;
