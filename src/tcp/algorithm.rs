//! Congestion-control algorithm selection.
//!
//! The three algorithms share the whole sender; they differ only in the
//! duplicate-ACK and recovery handling, dispatched on this tag.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Loss-based congestion-control variant of a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionAlgorithm {
    Tahoe,
    Reno,
    NewReno,
}

#[derive(Debug, Error)]
#[error("unknown congestion algorithm: {0} (expected Tahoe, Reno or NewReno)")]
pub struct UnknownAlgorithm(String);

impl FromStr for CongestionAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tahoe" => Ok(CongestionAlgorithm::Tahoe),
            "reno" => Ok(CongestionAlgorithm::Reno),
            "newreno" => Ok(CongestionAlgorithm::NewReno),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for CongestionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CongestionAlgorithm::Tahoe => "Tahoe",
            CongestionAlgorithm::Reno => "Reno",
            CongestionAlgorithm::NewReno => "NewReno",
        };
        f.write_str(name)
    }
}

/// Sender congestion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionMode {
    SlowStart,
    CongestionAvoidance,
    FastRecovery,
}
