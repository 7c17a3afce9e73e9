//! Simulation utilities and trace loading.
//!
//! Provides a request-level driver for the system and a loader for
//! plain-text request traces.

/// Request trace parsing.
pub mod loader;

/// Request-level simulator.
pub mod simulator;

pub use loader::{TraceOp, load_trace, parse_trace};
pub use simulator::{Completion, Simulator};
