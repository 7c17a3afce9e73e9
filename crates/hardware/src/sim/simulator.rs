//! Simulator: a well-behaved requester in front of the `System`.
//!
//! The tick-level interface leaves protocol discipline to the requester. The
//! simulator honours it on the caller's behalf: it presents a request only
//! while the controller is ready, asserts the request flag for exactly one
//! tick, holds address and data stable, and ticks until `done` pulses.

use crate::common::error::{ConfigError, RequestError, TraceError};
use crate::config::Config;
use crate::core::controller::{CacheInputs, RequestKind};
use crate::sim::loader::TraceOp;
use crate::soc::System;
use crate::soc::memory::BackingStore;
use crate::stats::CacheStats;

/// Result of one serviced request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Read response (reads only).
    pub read_data: Option<u64>,
    /// Completed from LOOKUP without touching the line's backing store region.
    pub hit: bool,
    /// Ticks from presentation to `done`, inclusive.
    pub cycles: u64,
}

/// Request-level driver for a [`System`].
#[derive(Debug)]
pub struct Simulator {
    /// The simulated system.
    pub system: System,
}

impl Simulator {
    /// Builds a simulator with a flat backing store.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            system: System::new(config)?,
        })
    }

    /// Builds a simulator around a caller-provided backing store.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid cache geometry.
    pub fn with_store(config: &Config, store: Box<dyn BackingStore>) -> Result<Self, ConfigError> {
        Ok(Self {
            system: System::with_store(config, store)?,
        })
    }

    /// Controller statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.system.controller.stats
    }

    /// Reads `address` through the cache.
    ///
    /// # Errors
    ///
    /// See [`Simulator::service`].
    pub fn read(&mut self, address: u64) -> Result<Completion, RequestError> {
        self.service(RequestKind::Read, address, 0)
    }

    /// Writes `data` to `address` through the cache.
    ///
    /// # Errors
    ///
    /// See [`Simulator::service`].
    pub fn write(&mut self, address: u64, data: u64) -> Result<Completion, RequestError> {
        self.service(RequestKind::Write, address, data)
    }

    /// Presents one request and ticks until it completes.
    ///
    /// # Errors
    ///
    /// - [`RequestError::NotReady`] if the controller is mid-service (only
    ///   possible after driving the system directly).
    /// - [`RequestError::AddressOutOfRange`] if `address` exceeds the address width.
    /// - [`RequestError::DataTooWide`] if a write payload exceeds the data width.
    pub fn service(
        &mut self,
        kind: RequestKind,
        address: u64,
        data: u64,
    ) -> Result<Completion, RequestError> {
        let geometry = *self.system.controller.geometry();
        if !self.system.ready() {
            return Err(RequestError::NotReady);
        }
        if !geometry.layout.contains(address) {
            return Err(RequestError::AddressOutOfRange {
                address,
                width: geometry.layout.address_bits(),
            });
        }
        if kind == RequestKind::Write && data & !geometry.data_mask() != 0 {
            return Err(RequestError::DataTooWide {
                data,
                width: geometry.data_width,
            });
        }

        let hits_before = self.stats().hits;
        let mut inputs = match kind {
            RequestKind::Read => CacheInputs::read(address),
            RequestKind::Write => CacheInputs::write(address, data),
        };
        let mut cycles = 0;
        loop {
            let out = self.system.tick(&inputs);
            cycles += 1;
            inputs = inputs.hold();
            if out.done {
                return Ok(Completion {
                    read_data: (kind == RequestKind::Read).then_some(out.read_data),
                    hit: self.stats().hits > hits_before,
                    cycles,
                });
            }
        }
    }

    /// Writes `data` straight into the backing store, bypassing the cache.
    pub fn preload(&mut self, address: u64, data: u64) {
        self.system.store.poke(address, data);
    }

    /// Reads the backing store without involving the cache.
    pub fn peek(&self, address: u64) -> u64 {
        self.system.store.peek(address)
    }

    /// Asserts reset for one tick.
    pub fn reset(&mut self) {
        let _ = self.system.tick(&CacheInputs::reset());
    }

    /// Services every operation of a trace in order.
    ///
    /// Returns one completion per read or write; preloads produce none.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected operation.
    pub fn run_trace(&mut self, ops: &[TraceOp]) -> Result<Vec<Completion>, TraceError> {
        let mut completions = Vec::with_capacity(ops.len());
        for op in ops {
            match *op {
                TraceOp::Read { address } => completions.push(self.read(address)?),
                TraceOp::Write { address, data } => completions.push(self.write(address, data)?),
                TraceOp::Preload { address, data } => self.preload(address, data),
            }
        }
        Ok(completions)
    }
}
