//! Cache core.
//!
//! This module contains the cache array with its replacement policies and the
//! controller state machine that drives it.

/// Cache controller (FSM, request latch, victim snapshot).
pub mod controller;

/// Storage units (cache array, replacement policies).
pub mod units;

pub use self::controller::CacheController;
