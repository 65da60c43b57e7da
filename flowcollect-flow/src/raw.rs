//! ## flowcollect-flow::raw
//! The record exactly as the kernel probe emits it.
//!
//! The kernel `flow_record_t` is a packed struct: `flow_id_t` followed by
//! `flow_metrics_t`, little endian, no padding. The layout is written out
//! field by field here instead of relying on Rust struct layout.

use bytes::Buf;
use serde::{Deserialize, Serialize};

use crate::key::RecordKey;
use crate::metrics::RecordMetrics;

/// Packed size of the kernel `flow_record_t`.
pub const RAW_RECORD_SIZE: usize = RecordKey::SIZE + RecordMetrics::SIZE;

/// Position of one field inside the packed kernel record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

const fn field(name: &'static str, offset: usize, size: usize) -> FieldLayout {
    FieldLayout { name, offset, size }
}

/// Kernel record layout, in wire order.
pub const LAYOUT: &[FieldLayout] = &[
    field("EthProtocol", 0, 2),
    field("Direction", 2, 1),
    field("SrcMac", 3, 6),
    field("DstMac", 9, 6),
    field("SrcAddr", 15, 16),
    field("DstAddr", 31, 16),
    field("SrcPort", 47, 2),
    field("DstPort", 49, 2),
    field("Protocol", 51, 1),
    field("IfIndex", 52, 4),
    field("Packets", 56, 4),
    field("Bytes", 60, 8),
    field("StartMonoTimeNs", 68, 8),
    field("EndMonoTimeNs", 76, 8),
];

const fn layout_is_packed(fields: &[FieldLayout]) -> bool {
    let mut i = 0;
    let mut next = 0;
    while i < fields.len() {
        if fields[i].offset != next {
            return false;
        }
        next += fields[i].size;
        i += 1;
    }
    next == RAW_RECORD_SIZE
}

const _: () = assert!(RecordKey::SIZE == 56);
const _: () = assert!(RecordMetrics::SIZE == 28);
const _: () = assert!(layout_is_packed(LAYOUT));

/// Record as parsed from the probe. Must coincide byte by byte with the
/// kernel `flow_record_t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(flatten)]
    pub key: RecordKey,
    #[serde(flatten)]
    pub metrics: RecordMetrics,
}

impl RawRecord {
    pub const SIZE: usize = RAW_RECORD_SIZE;

    pub fn new(key: RecordKey, metrics: RecordMetrics) -> Self {
        Self { key, metrics }
    }

    /// Decodes one record from its packed little-endian form.
    pub fn from_bytes(bytes: &[u8; RAW_RECORD_SIZE]) -> Self {
        let mut buf = &bytes[..];
        let key = RecordKey::decode(&mut buf);
        let metrics = RecordMetrics::decode(&mut buf);
        debug_assert!(!buf.has_remaining());
        Self { key, metrics }
    }

    /// Encodes the record in the same packed form the probe writes.
    pub fn to_bytes(&self) -> [u8; RAW_RECORD_SIZE] {
        let mut out = [0u8; RAW_RECORD_SIZE];
        let mut buf = &mut out[..];
        self.key.encode(&mut buf);
        self.metrics.encode(&mut buf);
        out
    }
}
