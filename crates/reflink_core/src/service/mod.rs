//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collaborators and pure transformations into full reloads.
//! - Keep presentation layers decoupled from reload sequencing.

pub mod library_service;
pub mod snapshot;
