//! Set-associative cache controller model.
//!
//! This crate models a set-associative cache in front of a flat, word-addressed
//! backing store, stepped in discrete synchronous ticks:
//! 1. **Cache array:** Per-line tag, data, valid and dirty state with exact age-based LRU.
//! 2. **Controller:** A single-request FSM (IDLE, LOOKUP, WRITEBACK, FETCH, FILL)
//!    enforcing write-through or write-back semantics with write-allocate.
//! 3. **Backing store:** A synchronous store with one tick of read latency.
//! 4. **Simulation:** Configuration, a request-level driver, trace loading and statistics.

/// Common types (address layout, errors).
pub mod common;
/// Cache configuration (defaults, enums, validation).
pub mod config;
/// Cache core (array, replacement policies, controller FSM).
pub mod core;
/// Request-level simulator and trace loader.
pub mod sim;
/// System components (backing store, system builder).
pub mod soc;
/// Cache statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Cache controller; owns the cache array and its statistics.
pub use crate::core::CacheController;
/// Request-level driver.
pub use crate::sim::Simulator;
/// Controller plus backing store, stepped together.
pub use crate::soc::System;
