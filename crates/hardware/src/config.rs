//! Configuration system for the cache model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the cache. It provides:
//! 1. **Defaults:** Baseline geometry (64 sets, 4 ways, 16-bit word addresses, 32-bit data).
//! 2. **Structures:** `CacheConfig` for the cache array and controller, `MemoryConfig` for the backing store.
//! 3. **Enums:** Write policy and replacement policy selection.
//! 4. **Validation:** `CacheGeometry`, the checked form every component is built from.
//!
//! Configuration is fixed at instantiation; it is never mutated at runtime.

use serde::Deserialize;

use crate::common::addr::{AddressLayout, low_mask};
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Default number of sets.
    pub const NUM_SETS: usize = 64;

    /// Default associativity (ways per set).
    pub const NUM_WAYS: usize = 4;

    /// Default address width in bits (word addressed).
    pub const ADDRESS_WIDTH: u32 = 16;

    /// Default data width in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Default tag width: `ADDRESS_WIDTH - log2(NUM_SETS) - OFFSET_WIDTH`.
    pub const TAG_WIDTH: u32 = 10;

    /// Default offset width (one word per line, nothing ignored).
    pub const OFFSET_WIDTH: u32 = 0;
}

/// Largest supported address width. The flat backing store holds `2^width` words.
pub const MAX_ADDRESS_WIDTH: u32 = 32;

/// Largest supported data width.
pub const MAX_DATA_WIDTH: u32 = u64::BITS;

/// Largest supported associativity.
pub const MAX_NUM_WAYS: usize = 1024;

/// Largest supported cache capacity in lines (`num_sets × num_ways`).
pub const MAX_CAPACITY_LINES: usize = 1 << 24;

/// Largest supported backing store, in words.
pub const MAX_STORE_WORDS: u64 = 1 << MAX_ADDRESS_WIDTH;

/// How committed writes reach the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Every committed write (hit or fill) is also written to the backing store
    /// in the same tick. Lines are never dirty.
    #[default]
    #[serde(alias = "write_through", alias = "WT")]
    WriteThrough,
    /// Writes only mark the line dirty; the backing store is updated when the
    /// dirty line is evicted.
    #[serde(alias = "write_back", alias = "WB")]
    WriteBack,
}

impl WritePolicy {
    /// Returns `true` for write-back (dirty tracking enabled).
    #[inline(always)]
    pub const fn is_write_back(self) -> bool {
        matches!(self, Self::WriteBack)
    }
}

/// Victim selection for a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Exact least-recently-used, tracked with a per-way recency age.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Recency tracking disabled; the victim is always way 0.
    #[serde(alias = "Disabled", alias = "NONE", alias = "None")]
    Disabled,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{Config, WritePolicy};
///
/// let json = r#"{
///     "cache": {
///         "num_sets": 16,
///         "num_ways": 2,
///         "address_width": 12,
///         "data_width": 64,
///         "tag_width": 8,
///         "write_policy": "WriteBack"
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.num_sets, 16);
/// assert_eq!(config.cache.offset_width, 0);
/// assert_eq!(config.cache.write_policy, WritePolicy::WriteBack);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache array and controller configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Backing store configuration
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a JSON configuration. Missing fields take their defaults.
    ///
    /// Parsing does not validate; call [`Config::validate`] or build a component.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown enum values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the cache geometry and the backing store size against it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`CacheConfig::validate`], or
    /// [`ConfigError::StoreTooSmall`] / [`ConfigError::StoreTooLarge`].
    pub fn validate(&self) -> Result<CacheGeometry, ConfigError> {
        let geometry = self.cache.validate()?;
        let required = geometry.address_space_words();
        let size = self.memory.size_words.unwrap_or(required);
        if size < required {
            return Err(ConfigError::StoreTooSmall { size, required });
        }
        if size > MAX_STORE_WORDS || usize::try_from(size).is_err() {
            return Err(ConfigError::StoreTooLarge {
                size,
                max: MAX_STORE_WORDS,
            });
        }
        Ok(geometry)
    }

    /// Backing store size in words after defaulting.
    pub fn store_words(&self) -> u64 {
        self.memory
            .size_words
            .unwrap_or_else(|| 1u64 << self.cache.address_width.min(MAX_ADDRESS_WIDTH))
    }
}

/// Cache array and controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (power of two)
    #[serde(default = "CacheConfig::default_sets")]
    pub num_sets: usize,

    /// Associativity (number of ways per set)
    #[serde(default = "CacheConfig::default_ways")]
    pub num_ways: usize,

    /// Request address width in bits
    #[serde(default = "CacheConfig::default_address_width")]
    pub address_width: u32,

    /// Line payload width in bits
    #[serde(default = "CacheConfig::default_data_width")]
    pub data_width: u32,

    /// Tag field width in bits
    #[serde(default = "CacheConfig::default_tag_width")]
    pub tag_width: u32,

    /// Ignored low-order address bits
    ///
    /// Offset bits take no part in line selection, so each line holds a
    /// single data word. Fetches and write-through stores use the full request
    /// address, while a dirty eviction is written back to the line-aligned
    /// address (offset zero): a dirty write to `0x1` is flushed to `0x0`.
    #[serde(default = "CacheConfig::default_offset_width")]
    pub offset_width: u32,

    /// Write-through or write-back
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Replacement policy for full sets
    #[serde(default)]
    pub replacement: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default number of sets.
    fn default_sets() -> usize {
        defaults::NUM_SETS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::NUM_WAYS
    }

    /// Returns the default address width.
    fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    /// Returns the default data width.
    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    /// Returns the default tag width.
    fn default_tag_width() -> u32 {
        defaults::TAG_WIDTH
    }

    /// Returns the default offset width.
    fn default_offset_width() -> u32 {
        defaults::OFFSET_WIDTH
    }

    /// Checks that the parameters describe a realizable cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the set or way count is zero, the set count
    /// is not a power of two, a width is out of range, the offset, set-index
    /// and tag fields do not partition the address exactly, or the way count
    /// or total capacity exceeds [`MAX_NUM_WAYS`] / [`MAX_CAPACITY_LINES`].
    pub fn validate(&self) -> Result<CacheGeometry, ConfigError> {
        if self.num_sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if self.num_ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if !self.num_sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo(self.num_sets));
        }
        if self.address_width == 0 || self.address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressWidthOutOfRange {
                width: self.address_width,
                max: MAX_ADDRESS_WIDTH,
            });
        }
        if self.data_width == 0 || self.data_width > MAX_DATA_WIDTH {
            return Err(ConfigError::DataWidthOutOfRange {
                width: self.data_width,
                max: MAX_DATA_WIDTH,
            });
        }

        let index = self.num_sets.trailing_zeros();
        let total = u64::from(self.offset_width) + u64::from(index) + u64::from(self.tag_width);
        if total != u64::from(self.address_width) {
            return Err(ConfigError::AddressPartition {
                offset: self.offset_width,
                index,
                tag: self.tag_width,
                address: self.address_width,
            });
        }

        if self.num_ways > MAX_NUM_WAYS {
            return Err(ConfigError::TooManyWays {
                ways: self.num_ways,
                max: MAX_NUM_WAYS,
            });
        }
        match self.num_sets.checked_mul(self.num_ways) {
            Some(lines) if lines <= MAX_CAPACITY_LINES => {}
            _ => {
                return Err(ConfigError::CapacityOverflow {
                    sets: self.num_sets,
                    ways: self.num_ways,
                    max: MAX_CAPACITY_LINES,
                });
            }
        }

        Ok(CacheGeometry {
            num_sets: self.num_sets,
            num_ways: self.num_ways,
            layout: AddressLayout::new(self.offset_width, index, self.tag_width),
            data_width: self.data_width,
            write_policy: self.write_policy,
            replacement: self.replacement,
        })
    }
}

impl Default for CacheConfig {
    /// Creates the default configuration: 64 sets × 4 ways, 16-bit word
    /// addresses, 32-bit data, write-through, LRU.
    fn default() -> Self {
        Self {
            num_sets: defaults::NUM_SETS,
            num_ways: defaults::NUM_WAYS,
            address_width: defaults::ADDRESS_WIDTH,
            data_width: defaults::DATA_WIDTH,
            tag_width: defaults::TAG_WIDTH,
            offset_width: defaults::OFFSET_WIDTH,
            write_policy: WritePolicy::default(),
            replacement: ReplacementPolicy::default(),
        }
    }
}

/// Backing store configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryConfig {
    /// Capacity in words. Defaults to the full address space (`2^address_width`).
    #[serde(default)]
    pub size_words: Option<u64>,
}

/// Validated cache parameters.
///
/// Only [`CacheConfig::validate`] produces this type, so holding one proves
/// the address fields partition the address exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// Number of sets.
    pub num_sets: usize,
    /// Ways per set.
    pub num_ways: usize,
    /// Address field layout.
    pub layout: AddressLayout,
    /// Line payload width in bits.
    pub data_width: u32,
    /// Write-through or write-back.
    pub write_policy: WritePolicy,
    /// Replacement policy.
    pub replacement: ReplacementPolicy,
}

impl CacheGeometry {
    /// Total number of lines (`num_sets × num_ways`).
    pub const fn capacity_lines(&self) -> usize {
        self.num_sets * self.num_ways
    }

    /// Mask selecting the low `data_width` bits.
    #[inline(always)]
    pub const fn data_mask(&self) -> u64 {
        low_mask(self.data_width)
    }

    /// Number of words addressable with the configured address width.
    pub const fn address_space_words(&self) -> u64 {
        1u64 << self.layout.address_bits()
    }
}
