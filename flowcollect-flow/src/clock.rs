//! ## flowcollect-flow::clock
//! Reference pair used to map kernel monotonic timestamps onto wall clock.

use chrono::{DateTime, Utc};
use nix::sys::time::TimeValLike;
use nix::time::ClockId;

/// Wall clock and monotonic clock read at (nearly) the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockReference {
    pub wall: DateTime<Utc>,
    /// `CLOCK_MONOTONIC` nanoseconds, the clock `bpf_ktime_get_ns` reads.
    pub monotonic_ns: u64,
}

impl ClockReference {
    pub fn new(wall: DateTime<Utc>, monotonic_ns: u64) -> Self {
        Self { wall, monotonic_ns }
    }

    /// Samples both clocks now.
    pub fn now() -> std::io::Result<Self> {
        let ts = ClockId::CLOCK_MONOTONIC
            .now()
            .map_err(|e| std::io::Error::from_raw_os_error(e as i32))?;
        Ok(Self {
            wall: Utc::now(),
            monotonic_ns: ts.num_nanoseconds() as u64,
        })
    }
}
