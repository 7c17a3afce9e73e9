//! Least Recently Used (LRU) Replacement Policy.
//!
//! Every way carries a recency age in `0..ways`: 0 is the most recently used,
//! `ways - 1` the least. At reset each way's age equals its way index.
//!
//! On an access the touched way's age drops to 0 and every way that was
//! strictly more recent than the touched way's old age ages by one. The ages
//! of a set therefore always form a permutation of `0..ways`, and the victim
//! is the way holding the maximum age.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(W) where W is the number of ways (associativity)
//!   - `victim()`: O(W) max-scan
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Hardware Cost:** `log2(W)` bits per way plus one comparator per way

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// Flattened `[set][way]` recency ages.
    ages: Vec<u32>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance with the identity age permutation.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut policy = Self {
            ages: vec![0; sets * ways],
            ways,
        };
        policy.reset();
        policy
    }

    #[inline(always)]
    fn set_ages(&self, set: usize) -> &[u32] {
        let base = set * self.ways;
        &self.ages[base..base + self.ways]
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Moves `way` to age 0 and ages every way that was more recent than it.
    fn touch(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let ages = &mut self.ages[base..base + self.ways];
        let old = ages[way];
        for age in ages.iter_mut() {
            if *age < old {
                *age += 1;
            }
        }
        ages[way] = 0;
    }

    /// Returns the way with the maximum age. Ties resolve to the lowest way.
    fn victim(&self, set: usize) -> usize {
        let mut victim = 0;
        let mut oldest = 0;
        for (way, &age) in self.set_ages(set).iter().enumerate() {
            if way == 0 || age > oldest {
                victim = way;
                oldest = age;
            }
        }
        victim
    }

    fn ages(&self, set: usize) -> Option<&[u32]> {
        Some(self.set_ages(set))
    }

    fn reset(&mut self) {
        for (i, age) in self.ages.iter_mut().enumerate() {
            *age = (i % self.ways) as u32;
        }
    }
}
