//! Backing Store.
//!
//! This module implements the flat, word-addressed storage behind the cache. It provides:
//! 1. **Port:** `StoreCommand`, the single access the controller issues per tick.
//! 2. **Trait:** `BackingStore`, the synchronous contract the controller drives.
//! 3. **Memory:** `FlatMemory`, a fixed-capacity implementation over a `WordBuffer`.
//!
//! Reads have one tick of latency: data for a read issued on tick `n` is
//! visible through [`BackingStore::read_data`] from tick `n + 1`. Writes take
//! effect at the end of the tick they are issued on.

/// Dense word storage for the flat memory.
pub mod buffer;

use self::buffer::WordBuffer;

/// Backing-store access issued by the controller for one tick.
///
/// The controller never reads and writes in the same tick, so the port is a
/// single command rather than independent enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreCommand {
    /// No access this tick.
    #[default]
    Idle,
    /// `read_data` becomes `mem[address]` from the next tick.
    Read {
        /// Word address.
        address: u64,
    },
    /// `mem[address] := data`.
    Write {
        /// Word address.
        address: u64,
        /// Payload.
        data: u64,
    },
}

/// Synchronous, address-indexed storage behind the cache.
///
/// The cache controller is the only component that issues commands to it.
pub trait BackingStore {
    /// Data latched by the most recent `Read` command.
    fn read_data(&self) -> u64;

    /// Advances the store by one tick, performing `command`.
    fn apply(&mut self, command: &StoreCommand);

    /// Reads a word without touching the read latch (inspection only).
    fn peek(&self, address: u64) -> u64;

    /// Writes a word outside the tick protocol (preloading).
    fn poke(&mut self, address: u64, data: u64);
}

/// Flat word-addressed memory with a one-tick read latch.
#[derive(Debug, Clone)]
pub struct FlatMemory {
    buffer: WordBuffer,
    read_latch: u64,
}

impl FlatMemory {
    /// Creates a zeroed memory of `words` words of `data_mask` width.
    pub fn new(words: usize, data_mask: u64) -> Self {
        Self {
            buffer: WordBuffer::new(words, data_mask),
            read_latch: 0,
        }
    }

    /// Capacity in words.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` for a zero-capacity memory.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl BackingStore for FlatMemory {
    #[inline(always)]
    fn read_data(&self) -> u64 {
        self.read_latch
    }

    fn apply(&mut self, command: &StoreCommand) {
        match *command {
            StoreCommand::Idle => {}
            StoreCommand::Read { address } => {
                self.read_latch = self.buffer.get(address).unwrap_or_else(|| {
                    tracing::warn!(address, "backing store read out of range");
                    0
                });
            }
            StoreCommand::Write { address, data } => {
                if !self.buffer.set(address, data) {
                    tracing::warn!(address, data, "backing store write out of range dropped");
                }
            }
        }
    }

    fn peek(&self, address: u64) -> u64 {
        self.buffer.get(address).unwrap_or(0)
    }

    fn poke(&mut self, address: u64, data: u64) {
        if !self.buffer.set(address, data) {
            tracing::warn!(address, data, "backing store preload out of range dropped");
        }
    }
}
