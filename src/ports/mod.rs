//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ScoreCache` - Memoization of derived results, keyed by input fingerprint

mod score_cache;

pub use score_cache::{get_or_compute, InputFingerprint, ScoreCache, ScoreCacheError};
