//! System Components.
//!
//! This module organizes the components around the cache controller: the
//! backing store and the builder that couples it with the controller.

/// System builder coupling the controller with its backing store.
pub mod builder;

/// Backing store contract and flat memory implementation.
pub mod memory;

pub use builder::System;
