//! Domain model for the reference library.
//!
//! # Responsibility
//! - Define the raw records delivered by the reference store.
//! - Define the canonical `Entry` and `NotesIndex` shapes produced by core.
//!
//! # Invariants
//! - Every structure is rebuilt from scratch on each reload.
//! - Ordered maps/sets are used so identical input builds identical values.

pub mod collection;
pub mod entry;
pub mod notes;
