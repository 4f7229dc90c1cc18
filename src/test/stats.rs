use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::stats::{SessionStats, CSV_HEADER};
use crate::tcp::CongestionAlgorithm;

fn sample_stats() -> SessionStats {
    SessionStats {
        iterations: 10,
        num_senders: 1,
        num_routers: 1,
        algorithm: CongestionAlgorithm::Reno,
        topology: "Direct".to_string(),
        bytes_transmitted: 1_048_576,
        bytes_retransmitted: 524_288,
        timeouts: 2,
    }
}

#[test]
fn throughput_and_retransmission_ratio() {
    let stats = sample_stats();
    assert_eq!(stats.throughput(), 0.1);
    assert_eq!(stats.retransmission_ratio(), 50.0);
}

#[test]
fn retransmission_ratio_is_zero_without_traffic() {
    let stats = SessionStats {
        bytes_transmitted: 0,
        bytes_retransmitted: 0,
        ..sample_stats()
    };
    assert_eq!(stats.retransmission_ratio(), 0.0);
    assert_eq!(stats.throughput(), 0.0);
}

#[test]
fn csv_file_name_embeds_algorithm_and_topology() {
    let stats = sample_stats();
    assert_eq!(stats.file_name(), "statisticsRenoDirect.csv");

    let stats = SessionStats {
        algorithm: CongestionAlgorithm::NewReno,
        topology: "Cloud".to_string(),
        ..sample_stats()
    };
    assert_eq!(stats.file_name(), "statisticsNewRenoCloud.csv");
}

#[test]
fn csv_row_is_plain_decimal() {
    let stats = sample_stats();
    assert_eq!(stats.csv_row(), "10,1,1,Reno,0.1,50,2");

    // A vanishingly small throughput must still print in full decimal.
    let stats = SessionStats {
        iterations: 1_000_000,
        bytes_transmitted: 1,
        bytes_retransmitted: 0,
        ..sample_stats()
    };
    let throughput = format!("{}", stats.throughput());
    assert!(!throughput.contains('e') && !throughput.contains('E'));
    assert!(throughput.starts_with("0.0"));
}

#[test]
fn write_csv_appends_and_writes_the_header_once() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tcpsim-stats-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("statisticsRenoDirect.csv");

    let stats = sample_stats();
    stats.write_csv(&path).expect("first write");
    stats.write_csv(&path).expect("second write");

    let contents = fs::read_to_string(&path).expect("read stats file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], stats.csv_row());
    assert_eq!(lines[2], stats.csv_row());

    let _ = fs::remove_dir_all(&dir);
}
