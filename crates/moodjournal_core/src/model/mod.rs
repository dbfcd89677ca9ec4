//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry record shared by storage, analysis and services.
//!
//! # Invariants
//! - Every entry is keyed by its calendar date.
//! - Derived values (mood index, sentiment) are never stored on the model.

pub mod entry;
