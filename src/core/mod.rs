//! core
//!
//! Configuration and validated domain types.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading
//! - [`types`] - Strong types: RepoSlug, BranchName
//!
//! # Design Principles
//!
//! - Strong typing rejects malformed input at the edge
//! - Schemas are strict: unknown keys are errors

pub mod config;
pub mod types;
