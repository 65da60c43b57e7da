//! ## flowcollect-flow::record
//! Raw records enriched with wall-clock times and an interface name.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::ClockReference;
use crate::key::RecordKey;
use crate::metrics::RecordMetrics;
use crate::raw::RawRecord;

/// Resolves an interface index to a display name.
///
/// Implemented for any `Fn(u32) -> String`; what an unknown index maps to is
/// up to the implementation.
pub trait InterfaceNamer {
    fn interface_name(&self, if_index: u32) -> String;
}

impl<F> InterfaceNamer for F
where
    F: Fn(u32) -> String,
{
    fn interface_name(&self, if_index: u32) -> String {
        self(if_index)
    }
}

/// Flow record with accumulated metrics, ready for export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub raw: RawRecord,
    #[serde(rename = "TimeFlowStart")]
    pub time_flow_start: DateTime<Utc>,
    #[serde(rename = "TimeFlowEnd")]
    pub time_flow_end: DateTime<Utc>,
    #[serde(rename = "Interface")]
    pub interface: String,
}

impl Record {
    /// Builds a record, translating the kernel monotonic timestamps using the
    /// `(current_time, monotonic_current_time)` reference pair.
    ///
    /// Both clocks are assumed to tick at the same rate. No drift correction
    /// is applied.
    pub fn new<N>(
        key: RecordKey,
        metrics: RecordMetrics,
        current_time: DateTime<Utc>,
        monotonic_current_time: u64,
        namer: &N,
    ) -> Self
    where
        N: InterfaceNamer + ?Sized,
    {
        let time_flow_start =
            mono_to_wall(current_time, monotonic_current_time, metrics.start_mono_time_ns);
        let time_flow_end =
            mono_to_wall(current_time, monotonic_current_time, metrics.end_mono_time_ns);
        Self {
            raw: RawRecord::new(key, metrics),
            time_flow_start,
            time_flow_end,
            interface: namer.interface_name(key.if_index),
        }
    }

    /// Same as [`Record::new`], taking a decoded record and a sampled clock pair.
    pub fn from_raw<N>(raw: RawRecord, clock: &ClockReference, namer: &N) -> Self
    where
        N: InterfaceNamer + ?Sized,
    {
        Self::new(raw.key, raw.metrics, clock.wall, clock.monotonic_ns, namer)
    }

    pub fn key(&self) -> &RecordKey {
        &self.raw.key
    }

    pub fn metrics(&self) -> &RecordMetrics {
        &self.raw.metrics
    }
}

/// `current_time - (monotonic_now - mono_ns)`. The unsigned difference wraps
/// and is read as signed, so timestamps slightly ahead of the reference land
/// after `current_time`. Results outside chrono's range saturate.
fn mono_to_wall(current_time: DateTime<Utc>, monotonic_now: u64, mono_ns: u64) -> DateTime<Utc> {
    let delta = monotonic_now.wrapping_sub(mono_ns) as i64;
    current_time
        .checked_sub_signed(TimeDelta::nanoseconds(delta))
        .unwrap_or(if delta > 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Direction, ETH_P_IPV4};
    use crate::mac::MacAddr;
    use chrono::TimeZone;
    use std::cell::Cell;

    fn key() -> RecordKey {
        RecordKey {
            eth_protocol: ETH_P_IPV4,
            direction: Direction::INGRESS,
            src_mac: MacAddr([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]),
            src_addr: "10.0.0.1".parse().unwrap(),
            dst_addr: "10.0.0.2".parse().unwrap(),
            src_port: 40000,
            dst_port: 80,
            protocol: 6,
            if_index: 2,
            ..Default::default()
        }
    }

    fn metrics(start: u64, end: u64) -> RecordMetrics {
        RecordMetrics {
            packets: 3,
            bytes: 180,
            start_mono_time_ns: start,
            end_mono_time_ns: end,
        }
    }

    fn wall() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_times_are_translated_from_reference() {
        let namer = |_: u32| "eth0".to_string();
        let record = Record::new(key(), metrics(900, 950), wall(), 1000, &namer);
        assert_eq!(record.time_flow_start, wall() - TimeDelta::nanoseconds(100));
        assert_eq!(record.time_flow_end, wall() - TimeDelta::nanoseconds(50));
        assert_eq!(record.interface, "eth0");
        assert_eq!(record.metrics().bytes, 180);
    }

    #[test]
    fn test_timestamp_after_reference() {
        let namer = |_: u32| String::new();
        let record = Record::new(key(), metrics(900, 1_200), wall(), 1000, &namer);
        assert_eq!(record.time_flow_end, wall() + TimeDelta::nanoseconds(200));
    }

    #[test]
    fn test_namer_called_once_with_if_index() {
        let calls = Cell::new(0);
        let namer = |idx: u32| {
            calls.set(calls.get() + 1);
            format!("if{idx}")
        };
        let clock = ClockReference::new(wall(), 5_000);
        let record = Record::from_raw(RawRecord::new(key(), metrics(1, 2)), &clock, &namer);
        assert_eq!(calls.get(), 1);
        assert_eq!(record.interface, "if2");
    }

    #[test]
    fn test_struct_namer() {
        struct Fixed;
        impl InterfaceNamer for Fixed {
            fn interface_name(&self, _: u32) -> String {
                "lo".into()
            }
        }
        let dyn_namer: &dyn InterfaceNamer = &Fixed;
        let record = Record::new(key(), metrics(1, 2), wall(), 3, dyn_namer);
        assert_eq!(record.interface, "lo");
    }

    #[test]
    fn test_json_shape() {
        let namer = |_: u32| "eth0".to_string();
        let record = Record::new(key(), metrics(900, 950), wall(), 1000, &namer);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Interface"], "eth0");
        assert_eq!(json["Proto"], 6);
        assert_eq!(json["FlowDirection"], 0);
        assert_eq!(json["SrcMac"], "de:ad:be:ef:00:01");
        assert_eq!(json["SrcAddr"], "10.0.0.1");
        assert_eq!(json["TimeFlowEnd"], "2024-05-01T11:59:59.999999950Z");
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let namer = |_: u32| "br_ex".to_string();
        let record = Record::new(key(), metrics(900, 950), wall(), 1000, &namer);

        let text = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.time_flow_start, wall() - TimeDelta::nanoseconds(100));

        let raw_text = serde_json::to_string(&record.raw).unwrap();
        let raw_back: RawRecord = serde_json::from_str(&raw_text).unwrap();
        assert_eq!(raw_back, record.raw);
    }

    #[test]
    fn test_json_with_malformed_address_is_rejected() {
        let namer = |_: u32| "eth0".to_string();
        let record = Record::new(key(), metrics(900, 950), wall(), 1000, &namer);
        let mut json = serde_json::to_value(&record).unwrap();
        json["SrcAddr"] = "10.0.0.300".into();
        assert!(serde_json::from_value::<Record>(json).is_err());
    }
}
