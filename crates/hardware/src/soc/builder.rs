//! System construction and top-level `System` type.
//!
//! This module builds the complete model from configuration. It performs:
//! 1. **Validation:** Checks the cache geometry and the backing store size.
//! 2. **Backing store:** Creates a lazily paged `FlatMemory` covering the address space, or adopts a caller-provided store.
//! 3. **Controller:** Instantiates the cache controller and its cache array.
//!
//! Every tick advances the controller and the backing store together; the
//! controller is the only component that drives the store.

use std::fmt;

use crate::common::error::ConfigError;
use crate::config::{Config, MAX_STORE_WORDS};
use crate::core::controller::{CacheController, CacheInputs, CacheOutputs};
use crate::soc::memory::{BackingStore, FlatMemory};

/// Top-level system instance: one cache controller in front of one backing store.
pub struct System {
    /// Cache controller (owns the cache array).
    pub controller: CacheController,
    /// Backing store, driven exclusively by the controller.
    pub store: Box<dyn BackingStore>,
}

impl System {
    /// Builds a system with a zeroed `FlatMemory` backing store.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid cache geometry or a backing
    /// store smaller than the address space or larger than [`MAX_STORE_WORDS`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let size = config.store_words();
        let words = usize::try_from(size).map_err(|_| ConfigError::StoreTooLarge {
            size,
            max: MAX_STORE_WORDS,
        })?;
        let store = FlatMemory::new(words, geometry.data_mask());
        tracing::info!(
            sets = geometry.num_sets,
            ways = geometry.num_ways,
            policy = ?geometry.write_policy,
            store_words = words,
            "system configured"
        );
        Ok(Self {
            controller: CacheController::from_geometry(geometry),
            store: Box::new(store),
        })
    }

    /// Builds a system around a caller-provided backing store.
    ///
    /// The store's capacity is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid cache geometry.
    pub fn with_store(config: &Config, store: Box<dyn BackingStore>) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: CacheController::new(&config.cache)?,
            store,
        })
    }

    /// Advances the system by one tick.
    pub fn tick(&mut self, inputs: &CacheInputs) -> CacheOutputs {
        self.controller.tick(inputs, self.store.as_mut())
    }

    /// `true` when a new request may be presented.
    pub fn ready(&self) -> bool {
        self.controller.ready()
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
