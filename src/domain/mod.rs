//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `validation` - Declarative field-level record validation
//! - `qualification` - Pillar scoring, coaching recommendations, and analytics

pub mod foundation;
pub mod qualification;
pub mod validation;
