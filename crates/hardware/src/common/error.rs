//! Error definitions.
//!
//! The cache core itself has no recoverable runtime errors: it is a closed,
//! deterministic state machine. Errors exist only at its edges:
//! 1. **Configuration:** bit widths or sizes that do not describe a valid cache.
//! 2. **Requests:** request-level API calls that would break the requester protocol.
//! 3. **Traces:** malformed request trace files.

use thiserror::Error;

/// Configuration misuse, rejected at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The cache must have at least one set.
    #[error("number of sets must be a positive integer")]
    ZeroSets,

    /// The cache must have at least one way per set.
    #[error("number of ways must be a positive integer")]
    ZeroWays,

    /// The set-index field can only select a power-of-two number of sets.
    #[error("number of sets ({0}) is not a power of two")]
    SetsNotPowerOfTwo(usize),

    /// Address width outside the supported range.
    #[error("address width {width} is outside 1..={max}")]
    AddressWidthOutOfRange {
        /// Configured width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },

    /// Data width outside the supported range.
    #[error("data width {width} is outside 1..={max}")]
    DataWidthOutOfRange {
        /// Configured width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },

    /// Offset, set-index and tag fields do not add up to the address width.
    #[error(
        "offset ({offset}) + set index ({index}) + tag ({tag}) bits != address width ({address})"
    )]
    AddressPartition {
        /// Offset field width.
        offset: u32,
        /// Set-index field width, `log2(num_sets)`.
        index: u32,
        /// Tag field width.
        tag: u32,
        /// Address width.
        address: u32,
    },

    /// More ways per set than the array supports.
    #[error("number of ways ({ways}) exceeds the maximum of {max}")]
    TooManyWays {
        /// Configured way count.
        ways: usize,
        /// Largest supported way count.
        max: usize,
    },

    /// `num_sets × num_ways` overflows or exceeds the supported line count.
    #[error("{sets} sets x {ways} ways exceeds the maximum capacity of {max} lines")]
    CapacityOverflow {
        /// Configured set count.
        sets: usize,
        /// Configured way count.
        ways: usize,
        /// Largest supported line count.
        max: usize,
    },

    /// The backing store cannot hold every address the cache can issue.
    #[error("backing store of {size} words is smaller than the {required}-word address space")]
    StoreTooSmall {
        /// Configured store size in words.
        size: u64,
        /// Words addressable with the configured address width.
        required: u64,
    },

    /// The backing store is larger than the host can index or the model supports.
    #[error("backing store of {size} words exceeds the maximum of {max} words")]
    StoreTooLarge {
        /// Configured store size in words.
        size: u64,
        /// Largest supported store size in words.
        max: u64,
    },

    /// JSON configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A request-level call that the requester protocol does not allow.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A request was presented while the controller was not idle.
    #[error("controller is busy servicing another request")]
    NotReady,

    /// The address has bits set above the configured address width.
    #[error("address {address:#x} does not fit in {width} address bits")]
    AddressOutOfRange {
        /// Offending address.
        address: u64,
        /// Configured address width.
        width: u32,
    },

    /// The write payload has bits set above the configured data width.
    #[error("data {data:#x} does not fit in {width} data bits")]
    DataTooWide {
        /// Offending payload.
        data: u64,
        /// Configured data width.
        width: u32,
    },
}

/// Failure while loading or replaying a request trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line is malformed.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A trace operation was rejected by the simulator.
    #[error(transparent)]
    Request(#[from] RequestError),
}
