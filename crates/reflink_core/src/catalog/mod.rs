//! Catalog ingestion: collection breadcrumbs and item normalization.
//!
//! # Responsibility
//! - Flatten the collection forest into display breadcrumbs.
//! - Turn raw store items into canonical `Entry` values.
//!
//! # Invariants
//! - Both steps are pure functions of their input.

pub mod normalizer;
pub mod paths;
