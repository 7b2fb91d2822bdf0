//! Free-text ranking over the in-memory entry set.
//!
//! # Responsibility
//! - Score entries against a query with fixed, hand-tuned weights.
//! - Keep result ordering deterministic and stable.

pub mod ranker;
