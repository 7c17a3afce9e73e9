//! Cache Controller.
//!
//! A finite-state machine that services one outstanding request at a time.
//! It accepts a request only in IDLE, looks it up in the cache array and, on a
//! miss, sequences an optional write-back of the victim, an optional fetch
//! from the backing store and the fill of the replacement line.
//!
//! Each [`tick`](CacheController::tick) has two phases:
//! 1. **Evaluate:** sample [`fsm::Signals`] and compute the [`control::Control`]
//!    decision and next state from committed state only.
//! 2. **Commit:** apply the decision to the registers, the cache array, the
//!    statistics and the backing store.

/// Per-tick control decision (pure output function).
pub mod control;

/// Controller states and the pure next-state function.
pub mod fsm;

use self::control::{Control, Datapath, outputs};
use self::fsm::{ControllerState, next_state};
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, CacheGeometry};
use crate::core::units::cache::CacheArray;
use crate::soc::memory::{BackingStore, StoreCommand};
use crate::stats::CacheStats;

/// Kind of an accepted request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Read the word at the request address.
    #[default]
    Read,
    /// Write the request payload at the request address.
    Write,
}

/// Request register, captured verbatim when a request is accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// Request address.
    pub address: u64,
    /// Read or write.
    pub kind: RequestKind,
    /// Write payload (masked to the data width).
    pub write_data: u64,
}

/// Snapshot of the line chosen for replacement, taken once when LOOKUP misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VictimCandidate {
    /// Replacement way.
    pub way: usize,
    /// Tag held by the way at snapshot time.
    pub tag: u64,
    /// Data held by the way at snapshot time.
    pub data: u64,
    /// Validity at snapshot time.
    pub valid: bool,
    /// Dirtiness at snapshot time.
    pub dirty: bool,
}

/// Requester inputs for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheInputs {
    /// Read requested.
    pub read: bool,
    /// Write requested.
    pub write: bool,
    /// Request address, held stable until `done`.
    pub address: u64,
    /// Write payload, held stable until `done`.
    pub write_data: u64,
    /// Synchronous reset.
    pub reset: bool,
}

impl CacheInputs {
    /// Idle inputs: nothing requested.
    pub const fn idle() -> Self {
        Self {
            read: false,
            write: false,
            address: 0,
            write_data: 0,
            reset: false,
        }
    }

    /// Read request for `address`.
    pub const fn read(address: u64) -> Self {
        Self {
            read: true,
            ..Self::idle()
        }
        .at(address)
    }

    /// Write request of `data` to `address`.
    pub const fn write(address: u64, data: u64) -> Self {
        Self {
            write: true,
            write_data: data,
            ..Self::idle()
        }
        .at(address)
    }

    /// Reset assertion.
    pub const fn reset() -> Self {
        Self {
            reset: true,
            ..Self::idle()
        }
    }

    /// Same inputs with the request flags deasserted (address and data held).
    pub const fn hold(self) -> Self {
        Self {
            read: false,
            write: false,
            ..self
        }
    }

    const fn at(self, address: u64) -> Self {
        Self { address, ..self }
    }

    /// Kind of request presented, if any.
    ///
    /// Read and write asserted together are taken as a write: the write
    /// payload is committed and no fetch is issued.
    pub const fn requested_kind(&self) -> Option<RequestKind> {
        if self.write {
            Some(RequestKind::Write)
        } else if self.read {
            Some(RequestKind::Read)
        } else {
            None
        }
    }
}

/// Requester-visible outputs after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheOutputs {
    /// A new request may be presented on the next tick.
    pub ready: bool,
    /// A request completed on this tick. Never asserted on two ticks in a row.
    pub done: bool,
    /// Read response register; valid when `done` pulses for a read.
    pub read_data: u64,
}

/// Cache controller: FSM, request and victim registers, and the cache array.
#[derive(Debug)]
pub struct CacheController {
    geometry: CacheGeometry,
    state: ControllerState,
    request: Request,
    victim: VictimCandidate,
    read_data: u64,
    array: CacheArray,
    /// Performance counters.
    pub stats: CacheStats,
}

impl CacheController {
    /// Creates a controller in its reset state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration does not describe a
    /// valid cache.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_geometry(config.validate()?))
    }

    /// Creates a controller from already validated parameters.
    pub fn from_geometry(geometry: CacheGeometry) -> Self {
        Self {
            array: CacheArray::new(&geometry),
            geometry,
            state: ControllerState::Idle,
            request: Request::default(),
            victim: VictimCandidate::default(),
            read_data: 0,
            stats: CacheStats::default(),
        }
    }

    /// Validated parameters.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Current FSM state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// `true` only in IDLE: a request presented on the next tick is accepted.
    pub const fn ready(&self) -> bool {
        matches!(self.state, ControllerState::Idle)
    }

    /// Latched request register.
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// Victim snapshot register.
    pub const fn victim(&self) -> &VictimCandidate {
        &self.victim
    }

    /// Read response register.
    pub const fn read_data(&self) -> u64 {
        self.read_data
    }

    /// The cache array (read-only).
    pub const fn array(&self) -> &CacheArray {
        &self.array
    }

    /// Advances the controller and the backing store by one tick.
    ///
    /// With `inputs.reset` asserted the controller returns to IDLE, clears
    /// its registers and reinitializes the cache array; a pending write-back
    /// is dropped and the store sees no access.
    pub fn tick(&mut self, inputs: &CacheInputs, store: &mut dyn BackingStore) -> CacheOutputs {
        self.stats.cycles += 1;

        if inputs.reset {
            tracing::info!(state = %self.state, cycle = self.stats.cycles, "reset asserted");
            self.reset();
            store.apply(&StoreCommand::Idle);
            return self.outputs(false);
        }

        let state = self.state;
        let (next, control) = {
            let dp = Datapath {
                geometry: &self.geometry,
                array: &self.array,
                inputs,
                request: &self.request,
                victim: &self.victim,
                store_data: store.read_data(),
            };
            let signals = dp.sample(state);
            (next_state(state, &signals), outputs(state, &signals, &dp))
        };

        if inputs.read && inputs.write && state == ControllerState::Idle {
            tracing::warn!(
                address = inputs.address,
                "read and write asserted together; servicing as a write"
            );
        }
        if next != state {
            tracing::trace!(cycle = self.stats.cycles, from = %state, to = %next, "state transition");
        }

        let done = control.response.is_some();
        self.commit(&control, store);
        self.state = next;
        self.outputs(done)
    }

    /// Applies one tick's decision.
    fn commit(&mut self, control: &Control, store: &mut dyn BackingStore) {
        if let Some(request) = control.accept {
            self.stats.requests += 1;
            match request.kind {
                RequestKind::Read => self.stats.reads += 1,
                RequestKind::Write => self.stats.writes += 1,
            }
            tracing::debug!(
                address = request.address,
                kind = ?request.kind,
                data = request.write_data,
                "request accepted"
            );
            self.request = request;
        }

        if let Some(victim) = control.victim {
            if victim.valid {
                self.stats.evictions += 1;
            }
            tracing::debug!(
                way = victim.way,
                tag = victim.tag,
                valid = victim.valid,
                dirty = victim.dirty,
                "miss; victim captured"
            );
            self.victim = victim;
        }

        if let Some(commit) = control.line_write {
            self.array.write_line(commit.set, commit.way, commit.line);
        }
        if let Some((set, way)) = control.touch {
            self.array.touch(set, way);
        }

        match control.store {
            StoreCommand::Idle => {}
            StoreCommand::Read { address } => {
                self.stats.fetches += 1;
                tracing::debug!(address, "fetch issued");
            }
            StoreCommand::Write { address, data } => {
                self.stats.store_writes += 1;
                if self.state == ControllerState::WriteBack {
                    self.stats.writebacks += 1;
                    tracing::debug!(address, data, "dirty victim written back");
                }
            }
        }
        store.apply(&control.store);

        if let Some(response) = control.response {
            if response.hit {
                self.stats.hits += 1;
            } else {
                self.stats.misses += 1;
            }
            if let Some(data) = response.read_data {
                self.read_data = data;
            }
            tracing::debug!(
                address = self.request.address,
                hit = response.hit,
                data = response.read_data,
                "request complete"
            );
        }
    }

    /// Returns to IDLE with cleared registers and a reinitialized cache array.
    ///
    /// Resetting twice leaves the same state as resetting once.
    pub fn reset(&mut self) {
        self.stats.resets += 1;
        self.state = ControllerState::Idle;
        self.request = Request::default();
        self.victim = VictimCandidate::default();
        self.read_data = 0;
        self.array.reset();
    }

    fn outputs(&self, done: bool) -> CacheOutputs {
        CacheOutputs {
            ready: self.ready(),
            done,
            read_data: self.read_data,
        }
    }
}
