//! Cache Replacement Policies.
//!
//! Tracks per-set recency state and selects the victim way of a full set.
//!
//! # Policies
//!
//! - `Lru`: exact least-recently-used with a per-way recency age.
//! - `FirstWay`: recency tracking disabled, the victim is always way 0.
//!
//! Allocation into invalid ways is decided by the cache array, not the policy.

/// Least Recently Used replacement policy (per-way age counters).
pub mod lru;

/// Replacement with recency tracking disabled.
pub mod first_way;

pub use first_way::FirstWayPolicy;
pub use lru::LruPolicy;

use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// `victim` is a pure query over the committed state; only `touch` and
/// `reset` mutate it.
pub trait ReplacementPolicy: std::fmt::Debug + Send + Sync {
    /// Records an access to `way` of `set`, making it the most recently used.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn touch(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn victim(&self, set: usize) -> usize;

    /// Recency ages of every way in `set` (0 = most recently used), if tracked.
    fn ages(&self, set: usize) -> Option<&[u32]>;

    /// Restores the initial state of every set.
    fn reset(&mut self);
}

/// Builds the policy selected by the configuration.
pub fn build(policy: PolicyType, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyType::Disabled => Box::new(FirstWayPolicy),
    }
}
