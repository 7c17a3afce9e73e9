//! Storage units.
//!
//! This module contains the set-associative cache array and its replacement
//! policies.

/// Set-associative cache array with replacement policies.
pub mod cache;
