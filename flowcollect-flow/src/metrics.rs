//! ## flowcollect-flow::metrics
//! Per-flow counters and timing bounds, and the merge used by aggregators.

use std::time::Duration;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

/// Flow metrics and timing. Must coincide byte by byte with the kernel
/// `flow_metrics_t`.
///
/// Timestamps are monotonic nanoseconds as sampled by the kernel
/// (`bpf_ktime_get_ns`). Zero means "not set".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordMetrics {
    #[serde(rename = "Packets")]
    pub packets: u32,
    #[serde(rename = "Bytes")]
    pub bytes: u64,
    #[serde(rename = "StartMonoTimeNs")]
    pub start_mono_time_ns: u64,
    #[serde(rename = "EndMonoTimeNs")]
    pub end_mono_time_ns: u64,
}

impl RecordMetrics {
    /// Packed size of the metrics in the kernel record.
    pub const SIZE: usize = 4 + 8 + 8 + 8;

    /// Merges `src` into `self`.
    ///
    /// Start becomes the earliest set start, end the latest set end, and the
    /// counters are summed. `src` must be a new contribution: merging the same
    /// sample twice counts it twice.
    pub fn accumulate(&mut self, src: &RecordMetrics) {
        // time == 0 if the value has not been set yet
        if src.start_mono_time_ns != 0
            && (self.start_mono_time_ns == 0 || self.start_mono_time_ns > src.start_mono_time_ns)
        {
            self.start_mono_time_ns = src.start_mono_time_ns;
        }
        if self.end_mono_time_ns == 0 || self.end_mono_time_ns < src.end_mono_time_ns {
            self.end_mono_time_ns = src.end_mono_time_ns;
        }
        self.bytes = self.bytes.wrapping_add(src.bytes);
        self.packets = self.packets.wrapping_add(src.packets);
    }

    /// Time between first and last packet, when both bounds are set.
    pub fn duration(&self) -> Option<Duration> {
        if self.start_mono_time_ns == 0 || self.end_mono_time_ns == 0 {
            return None;
        }
        self.end_mono_time_ns
            .checked_sub(self.start_mono_time_ns)
            .map(Duration::from_nanos)
    }

    pub(crate) fn decode<B: Buf>(buf: &mut B) -> Self {
        Self {
            packets: buf.get_u32_le(),
            bytes: buf.get_u64_le(),
            start_mono_time_ns: buf.get_u64_le(),
            end_mono_time_ns: buf.get_u64_le(),
        }
    }

    pub(crate) fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.packets);
        buf.put_u64_le(self.bytes);
        buf.put_u64_le(self.start_mono_time_ns);
        buf.put_u64_le(self.end_mono_time_ns);
    }
}
