//! ## flowcollect-telemetry::metrics
//! **Prometheus counters for the decode path**

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub records_decoded: IntCounter,
    pub decode_errors: IntCounter,
    pub flow_bytes: IntCounter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let records_decoded = IntCounter::new(
            "flowcollect_records_decoded_total",
            "Raw flow records decoded from the probe stream",
        )?;
        let decode_errors = IntCounter::new(
            "flowcollect_decode_errors_total",
            "Short reads and I/O failures while decoding",
        )?;
        let flow_bytes = IntCounter::new(
            "flowcollect_flow_bytes_total",
            "Sum of the byte counters of decoded records",
        )?;

        registry.register(Box::new(records_decoded.clone()))?;
        registry.register(Box::new(decode_errors.clone()))?;
        registry.register(Box::new(flow_bytes.clone()))?;

        Ok(Self {
            registry,
            records_decoded,
            decode_errors,
            flow_bytes,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn inc_records_decoded(&self, flow_bytes: u64) {
        self.records_decoded.inc();
        self.flow_bytes.inc_by(flow_bytes);
    }

    pub fn inc_decode_errors(&self) {
        self.decode_errors.inc();
    }
}
