//! Common types shared by every component of the cache model.
//!
//! 1. **Address Layout:** splitting request addresses into tag, set index and offset.
//! 2. **Error Handling:** configuration, request and trace error types.

/// Address decomposition (offset / set index / tag).
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{AddressLayout, DecodedAddress};
pub use error::{ConfigError, RequestError, TraceError};
