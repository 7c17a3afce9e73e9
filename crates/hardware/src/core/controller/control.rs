//! Per-tick control decision.
//!
//! Each tick the controller samples a [`Datapath`], a read-only view of the
//! state committed at the end of the previous tick, and derives one
//! [`Control`] value describing every side effect of the tick: the request
//! latch, the victim snapshot, the cache line commit, the recency update, the
//! backing-store command and the response. Nothing is mutated until the whole
//! decision has been computed, so no part of a tick observes another part's
//! writes.

use super::fsm::{ControllerState, Signals};
use super::{CacheInputs, Request, RequestKind, VictimCandidate};
use crate::config::CacheGeometry;
use crate::core::units::cache::{CacheArray, CacheLine};
use crate::soc::memory::StoreCommand;

/// Read-only view of everything a tick may observe.
#[derive(Clone, Copy, Debug)]
pub struct Datapath<'a> {
    /// Validated cache parameters.
    pub geometry: &'a CacheGeometry,
    /// Committed cache array state.
    pub array: &'a CacheArray,
    /// Requester inputs for this tick.
    pub inputs: &'a CacheInputs,
    /// Latched request register.
    pub request: &'a Request,
    /// Victim snapshot register.
    pub victim: &'a VictimCandidate,
    /// Backing-store read data latched on the previous tick.
    pub store_data: u64,
}

/// Line commit: `(set, way) := line`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCommit {
    /// Set index.
    pub set: usize,
    /// Way index.
    pub way: usize,
    /// New line contents.
    pub line: CacheLine,
}

/// Completion of the request being serviced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Response {
    /// Payload for read requests.
    pub read_data: Option<u64>,
    /// Completed from LOOKUP (hit) rather than FILL (miss).
    pub hit: bool,
}

/// Every side effect of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Control {
    /// Request to latch (IDLE only).
    pub accept: Option<Request>,
    /// Victim snapshot to capture (leaving LOOKUP on a miss).
    pub victim: Option<VictimCandidate>,
    /// Cache line to commit.
    pub line_write: Option<LineCommit>,
    /// `(set, way)` to make most recently used.
    pub touch: Option<(usize, usize)>,
    /// Backing-store access.
    pub store: StoreCommand,
    /// Completion pulse and payload.
    pub response: Option<Response>,
}

impl Datapath<'_> {
    /// Samples the combinational signals for `state`.
    pub fn sample(&self, state: ControllerState) -> Signals {
        match state {
            ControllerState::Idle => Signals {
                request: self.inputs.requested_kind(),
                ..Signals::default()
            },
            ControllerState::Lookup => {
                let addr = self.geometry.layout.decode(self.request.address);
                let lookup = self.array.lookup(addr.set, addr.tag);
                let candidate = self.array.read_set(addr.set)[lookup.replacement_way];
                Signals {
                    request: Some(self.request.kind),
                    lookup: Some(lookup),
                    write_back_needed: !lookup.is_hit()
                        && self.geometry.write_policy.is_write_back()
                        && candidate.valid
                        && candidate.dirty,
                }
            }
            ControllerState::WriteBack | ControllerState::Fetch | ControllerState::Fill => {
                Signals {
                    request: Some(self.request.kind),
                    ..Signals::default()
                }
            }
        }
    }
}

/// Computes the side effects of one tick from the current state and signals.
pub fn outputs(state: ControllerState, signals: &Signals, dp: &Datapath<'_>) -> Control {
    let write_back = dp.geometry.write_policy.is_write_back();
    let request = dp.request;
    let addr = dp.geometry.layout.decode(request.address);

    match state {
        ControllerState::Idle => Control {
            accept: signals.request.map(|kind| Request {
                address: dp.inputs.address,
                kind,
                write_data: dp.inputs.write_data & dp.geometry.data_mask(),
            }),
            ..Control::default()
        },

        ControllerState::Lookup => {
            let Some(lookup) = signals.lookup else {
                return Control::default();
            };
            let lines = dp.array.read_set(addr.set);

            if let Some(way) = lookup.hit_way {
                let line = lines[way];
                let mut control = Control {
                    touch: Some((addr.set, way)),
                    response: Some(Response {
                        read_data: (request.kind == RequestKind::Read).then_some(line.data),
                        hit: true,
                    }),
                    ..Control::default()
                };
                if request.kind == RequestKind::Write {
                    control.line_write = Some(LineCommit {
                        set: addr.set,
                        way,
                        line: CacheLine {
                            data: request.write_data,
                            dirty: write_back,
                            ..line
                        },
                    });
                    if !write_back {
                        control.store = StoreCommand::Write {
                            address: request.address,
                            data: request.write_data,
                        };
                    }
                }
                control
            } else {
                let way = lookup.replacement_way;
                let line = lines[way];
                Control {
                    victim: Some(VictimCandidate {
                        way,
                        tag: line.tag,
                        data: line.data,
                        valid: line.valid,
                        dirty: line.dirty,
                    }),
                    ..Control::default()
                }
            }
        }

        ControllerState::WriteBack => Control {
            store: StoreCommand::Write {
                address: dp.geometry.layout.line_address(dp.victim.tag, addr.set),
                data: dp.victim.data,
            },
            ..Control::default()
        },

        ControllerState::Fetch => Control {
            store: StoreCommand::Read {
                address: request.address,
            },
            ..Control::default()
        },

        ControllerState::Fill => {
            let is_write = request.kind == RequestKind::Write;
            let data = if is_write {
                request.write_data
            } else {
                dp.store_data & dp.geometry.data_mask()
            };
            Control {
                line_write: Some(LineCommit {
                    set: addr.set,
                    way: dp.victim.way,
                    line: CacheLine {
                        tag: addr.tag,
                        data,
                        valid: true,
                        dirty: is_write && write_back,
                    },
                }),
                touch: Some((addr.set, dp.victim.way)),
                store: if is_write && !write_back {
                    StoreCommand::Write {
                        address: request.address,
                        data,
                    }
                } else {
                    StoreCommand::Idle
                },
                response: Some(Response {
                    read_data: (!is_write).then_some(data),
                    hit: false,
                }),
                ..Control::default()
            }
        }
    }
}
