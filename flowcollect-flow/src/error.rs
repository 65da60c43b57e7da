//! ## flowcollect-flow::error
//! Error types for address parsing and record decoding.

use thiserror::Error;

/// Errors raised while building addresses from raw bytes or text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The byte slice does not have the fixed width of the target type.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// Text is not a colon-separated six octet hardware address.
    #[error("Malformed hardware address: {0}")]
    InvalidMac(String),
    /// Text is neither an IPv4 nor an IPv6 address.
    #[error("Malformed IP address: {0}")]
    InvalidAddr(String),
}

/// Errors raised while reading a raw record from a byte stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended before a whole record was read.
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True when the stream was exhausted exactly at a record boundary.
    pub fn is_clean_eof(&self) -> bool {
        matches!(self, DecodeError::ShortRead { actual: 0, .. })
    }
}
