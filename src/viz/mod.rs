//! Congestion-trace logging for offline plotting.
//!
//! One sample per sender per tick: the congestion parameters that the
//! simulator historically printed as per-iteration columns
//! (CongWindow / EffctWindow / FlightSize / SSThresh).

use serde::Serialize;

/// One sender's congestion parameters at the end of a tick.
#[derive(Debug, Clone, Serialize)]
pub struct CwndSample {
    pub tick: u64,
    /// Arena index of the sending endpoint.
    pub endpoint: usize,
    pub cwnd: u64,
    pub effective_window: u64,
    pub flight_size: u64,
    pub ssthresh: u64,
}

/// Collector for [`CwndSample`]s, serialized as a JSON array.
#[derive(Debug, Default)]
pub struct CwndLogger {
    pub samples: Vec<CwndSample>,
}

impl CwndLogger {
    pub fn record(&mut self, sample: CwndSample) {
        self.samples.push(sample);
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.samples)
    }
}
