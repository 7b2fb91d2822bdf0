//! Annotation index ingestion and entry reconciliation.
//!
//! # Responsibility
//! - Classify and flatten the externally supplied notes index document.
//! - Build normalized lookup tables (`NotesIndex`).
//! - Link entries to notes through fixed-priority match tiers.
//!
//! # Invariants
//! - Loader and reconciler derive keys only through `crate::normalize`.
//! - A malformed document or row never fails the load.

pub mod loader;
pub mod reconciler;
pub mod shape;
