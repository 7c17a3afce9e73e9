//! Controller state machine.
//!
//! The next-state function is pure: it maps the current state and the
//! combinational signals sampled this tick to the state for the next tick.
//!
//! | From      | Condition                               | To        |
//! |-----------|-----------------------------------------|-----------|
//! | Idle      | no request                              | Idle      |
//! | Idle      | read or write requested                 | Lookup    |
//! | Lookup    | hit                                     | Idle      |
//! | Lookup    | miss, victim valid + dirty (write-back) | WriteBack |
//! | Lookup    | miss, no write-back, read               | Fetch     |
//! | Lookup    | miss, no write-back, write              | Fill      |
//! | WriteBack | read                                    | Fetch     |
//! | WriteBack | write                                   | Fill      |
//! | Fetch     | always                                  | Fill      |
//! | Fill      | always                                  | Idle      |

use std::fmt;

use super::RequestKind;
use crate::core::units::cache::Lookup;

/// Controller states. There is no terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Waiting for a request; the only state that accepts one.
    #[default]
    Idle,
    /// Tag comparison against the request's set.
    Lookup,
    /// Flushing the dirty victim to the backing store.
    WriteBack,
    /// Reading the missed line from the backing store.
    Fetch,
    /// Committing the replacement line.
    Fill,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Lookup => "LOOKUP",
            Self::WriteBack => "WRITEBACK",
            Self::Fetch => "FETCH",
            Self::Fill => "FILL",
        };
        f.write_str(name)
    }
}

/// Combinational signals sampled at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signals {
    /// In `Idle`, the request being presented; elsewhere, the latched request.
    pub request: Option<RequestKind>,
    /// Tag lookup, evaluated only in `Lookup`.
    pub lookup: Option<Lookup>,
    /// The replacement candidate is valid and dirty under write-back.
    pub write_back_needed: bool,
}

impl Signals {
    /// Returns `true` if the lookup hit.
    #[inline(always)]
    pub fn hit(&self) -> bool {
        self.lookup.is_some_and(|l| l.is_hit())
    }

    /// Returns `true` if the request being serviced is a write.
    #[inline(always)]
    pub fn is_write(&self) -> bool {
        self.request == Some(RequestKind::Write)
    }
}

/// Computes the state for the next tick.
pub fn next_state(state: ControllerState, signals: &Signals) -> ControllerState {
    use ControllerState::{Fetch, Fill, Idle, Lookup, WriteBack};

    match state {
        Idle if signals.request.is_some() => Lookup,
        Idle => Idle,
        Lookup if signals.hit() => Idle,
        Lookup if signals.write_back_needed => WriteBack,
        Lookup | WriteBack if signals.is_write() => Fill,
        Lookup | WriteBack => Fetch,
        Fetch => Fill,
        Fill => Idle,
    }
}
