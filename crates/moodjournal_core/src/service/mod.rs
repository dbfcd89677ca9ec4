//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and analysis into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.
//! - Pass journal state explicitly; no process-wide working collection.

pub mod entry_store;
pub mod journal_service;
