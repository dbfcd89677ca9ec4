//! Derived, non-persisted journal metrics.
//!
//! # Responsibility
//! - Compute the mood index and its trend summary.
//! - Score reflection text against a swappable lexicon.
//!
//! # Invariants
//! - Every function here is pure and deterministic; nothing is written back
//!   to entries or storage.

pub mod mood_index;
pub mod reflection;
pub mod sentiment;
