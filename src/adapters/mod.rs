//! Adapters - Implementations of port interfaces.
//!
//! - `cache` - Score cache implementations (in-memory)

pub mod cache;

pub use cache::InMemoryScoreCache;
