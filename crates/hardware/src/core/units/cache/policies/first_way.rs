//! Replacement with recency tracking disabled.
//!
//! Accesses are not recorded and the victim of a full set is always way 0.
//! Invalid-first allocation in the cache array still spreads fills across
//! the set until it is full.

use super::ReplacementPolicy;

/// Stateless policy that always evicts way 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWayPolicy;

impl ReplacementPolicy for FirstWayPolicy {
    fn touch(&mut self, _set: usize, _way: usize) {}

    fn victim(&self, _set: usize) -> usize {
        0
    }

    fn ages(&self, _set: usize) -> Option<&[u32]> {
        None
    }

    fn reset(&mut self) {}
}
