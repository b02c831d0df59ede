//! Deal Qualification - Scoring, coaching, and validation for sales opportunities
//!
//! This crate implements the qualification engine behind an opportunity
//! pipeline: declarative record validation, MEDDPICC-style pillar scoring,
//! gap-driven coaching, and batch analytics. Every engine is a pure function
//! of its inputs; callers own storage and presentation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
