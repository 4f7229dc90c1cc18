//! Session statistics: console summary and the append-only CSV artifact.
//!
//! Consumes the per-sender counters accumulated by the TCP senders. A stats
//! file failure is not fatal; the console summary is always produced.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::tcp::CongestionAlgorithm;
use crate::topo::Topology;

pub const STATISTICS_FILENAME: &str = "statistics";
pub const STATISTICS_FILE_EXTENSION: &str = ".csv";

/// Column headers of the statistics CSV, written once per new file.
pub const CSV_HEADER: &str = "Number of Iterations,Number of Senders,Number of Routers,\
Congestion Avoidance Algorithm,Throughput (MB/RTTs),Retransmission Ratio (% per MB),Timeouts";

/// Aggregated outcome of one simulation session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub iterations: u64,
    pub num_senders: usize,
    pub num_routers: usize,
    pub algorithm: CongestionAlgorithm,
    /// "Direct" or "Cloud"; part of the CSV file name.
    pub topology: String,
    pub bytes_transmitted: u64,
    pub bytes_retransmitted: u64,
    pub timeouts: u64,
}

impl SessionStats {
    /// Collects the summary counters from all senders of a finished run.
    pub fn collect(topo: &Topology, iterations: u64) -> Self {
        let totals = topo.total_stats();
        Self {
            iterations,
            num_senders: topo.num_senders(),
            num_routers: topo.num_routers(),
            algorithm: topo.algorithm(),
            topology: topo.kind().to_string(),
            bytes_transmitted: totals.bytes_transmitted,
            bytes_retransmitted: totals.bytes_retransmitted,
            timeouts: totals.timeouts,
        }
    }

    /// MB transmitted per transmission round.
    pub fn throughput(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        (self.bytes_transmitted as f64 / 1_048_576.0) / self.iterations as f64
    }

    /// Retransmitted share of all transmitted bytes, in percent.
    /// Zero when nothing was transmitted.
    pub fn retransmission_ratio(&self) -> f64 {
        if self.bytes_transmitted == 0 {
            return 0.0;
        }
        (self.bytes_retransmitted as f64 / self.bytes_transmitted as f64) * 100.0
    }

    /// `statistics<Algorithm><Topology>.csv`
    pub fn file_name(&self) -> String {
        format!(
            "{STATISTICS_FILENAME}{}{}{STATISTICS_FILE_EXTENSION}",
            self.algorithm, self.topology
        )
    }

    /// One CSV row. `f64` Display never produces scientific notation,
    /// so the numbers come out in full decimal.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.iterations,
            self.num_senders,
            self.num_routers,
            self.algorithm,
            self.throughput(),
            self.retransmission_ratio(),
            self.timeouts
        )
    }

    /// Appends the row to `path`, writing the header first if the file is new.
    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        let existed = path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if !existed {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(file, "{}", self.csv_row())
    }

    /// End-of-session console report.
    pub fn print_summary(&self) {
        println!(
            "     ====================  E N D   O F   S E S S I O N  ===================="
        );
        println!("Number of Iterations: {}", self.iterations);
        println!("Number of Senders: {}", self.num_senders);
        println!("Number of Routers: {}", self.num_routers);
        println!("Throughput (MB/RTTs): {}", self.throughput());
        println!(
            "Retransmission Ratio (% per MB): {}%",
            self.retransmission_ratio()
        );
        println!("Timeouts: {}", self.timeouts);
    }
}
