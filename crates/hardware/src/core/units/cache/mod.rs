//! Set-Associative Cache Array.
//!
//! This module holds the per-line metadata (tag, data, valid, dirty) of a
//! configurable `sets × ways` cache together with its recency state. It exposes:
//! 1. **Queries:** whole-set reads, tag lookup and victim selection. All are
//!    pure and recomputed from committed state on every call.
//! 2. **Commits:** single-line writes and recency updates. The controller applies
//!    them only after every query of a tick has been evaluated, so a commit is
//!    first observable on the following tick.
//! 3. **Reset:** every line invalid and clean, identity recency order per set.

/// Cache replacement policy implementations (LRU, recency disabled).
pub mod policies;

use self::policies::ReplacementPolicy;
use crate::config::CacheGeometry;

/// One storage slot, identified by `(set, way)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Tag of the region held by this line.
    pub tag: u64,
    /// Line payload.
    pub data: u64,
    /// Line holds live data.
    pub valid: bool,
    /// Line differs from the backing store (write-back only).
    pub dirty: bool,
}

/// Result of looking up a tag in one set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lookup {
    /// Way holding a valid line with the requested tag.
    pub hit_way: Option<usize>,
    /// Way a miss would fill: the first invalid way, or the policy victim when
    /// every way is valid.
    pub replacement_way: usize,
}

impl Lookup {
    /// Returns `true` on a hit.
    #[inline(always)]
    pub const fn is_hit(&self) -> bool {
        self.hit_way.is_some()
    }
}

/// Set-associative metadata and data store.
#[derive(Debug)]
pub struct CacheArray {
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    track_dirty: bool,
    policy: Box<dyn ReplacementPolicy>,
}

impl CacheArray {
    /// Creates a cache array in its reset state.
    ///
    /// Dirty tracking is enabled only under the write-back policy.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            lines: vec![CacheLine::default(); geometry.capacity_lines()],
            num_sets: geometry.num_sets,
            ways: geometry.num_ways,
            track_dirty: geometry.write_policy.is_write_back(),
            policy: policies::build(geometry.replacement, geometry.num_sets, geometry.num_ways),
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Ways per set.
    pub const fn num_ways(&self) -> usize {
        self.ways
    }

    /// Returns every way of `set` in way order.
    ///
    /// # Panics
    ///
    /// Panics if `set >= num_sets`. Set indices come from
    /// [`AddressLayout::decode`](crate::common::AddressLayout::decode), which
    /// never produces one out of range.
    #[inline]
    pub fn read_set(&self, set: usize) -> &[CacheLine] {
        let base = set * self.ways;
        &self.lines[base..base + self.ways]
    }

    /// Commits tag, data, valid and dirty of one line.
    ///
    /// `dirty` is forced to `false` when dirty tracking is disabled.
    pub fn write_line(&mut self, set: usize, way: usize, line: CacheLine) {
        let dirty = line.dirty && self.track_dirty;
        self.lines[set * self.ways + way] = CacheLine { dirty, ..line };
    }

    /// Makes `way` the most recently used way of `set`.
    pub fn touch(&mut self, set: usize, way: usize) {
        self.policy.touch(set, way);
    }

    /// The replacement policy's victim for `set`, ignoring validity.
    pub fn victim_way(&self, set: usize) -> usize {
        self.policy.victim(set)
    }

    /// Recency ages of `set`, or `None` when recency tracking is disabled.
    pub fn ages(&self, set: usize) -> Option<&[u32]> {
        self.policy.ages(set)
    }

    /// Looks `tag` up in `set` and picks the replacement candidate.
    ///
    /// A hit is a valid way with an equal tag. The candidate prefers the first
    /// invalid way in increasing way order, so a miss never evicts a valid
    /// line while the set still has free capacity.
    pub fn lookup(&self, set: usize, tag: u64) -> Lookup {
        let lines = self.read_set(set);
        let hit_way = lines.iter().position(|l| l.valid && l.tag == tag);
        let replacement_way = lines
            .iter()
            .position(|l| !l.valid)
            .unwrap_or_else(|| self.victim_way(set));
        Lookup {
            hit_way,
            replacement_way,
        }
    }

    /// Invalidates every line and restores the identity recency order.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy.reset();
    }
}
