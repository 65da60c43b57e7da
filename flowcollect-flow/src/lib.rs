//! # flowcollect Flow Records
//!
//! Crate for the flow records exchanged between the kernel probe and the
//! collector: fixed-width address codecs, the flow key and metrics, the packed
//! raw record and its decoder, and wall-clock enriched records.
//!
//! ### Layout:
//! - `raw`: packed little-endian kernel layout (84 bytes per record)
//! - `decoder`: blocking and async stream readers
//! - `record`: monotonic to wall-clock translation and interface naming

pub mod addr;
pub mod clock;
pub mod decoder;
pub mod error;
pub mod key;
pub mod mac;
pub mod metrics;
pub mod raw;
pub mod record;

pub use addr::IpAddr;
pub use clock::ClockReference;
#[cfg(feature = "async")]
pub use decoder::read_from_async;
pub use decoder::{read_from, RecordReader};
pub use error::{DecodeError, FlowError};
pub use key::{Direction, RecordKey, ETH_P_IPV4, ETH_P_IPV6};
pub use mac::MacAddr;
pub use metrics::RecordMetrics;
pub use raw::{RawRecord, RAW_RECORD_SIZE};
pub use record::{InterfaceNamer, Record};
