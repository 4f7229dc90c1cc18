use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tcpsim-{prefix}-{}-{nanos}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn tcpsim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tcpsim"))
}

#[test]
fn missing_arguments_exit_with_code_one() {
    let output = tcpsim().output().expect("run tcpsim");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unknown_algorithm_exits_with_code_one() {
    let output = tcpsim()
        .args(["Vegas", "10", "Direct"])
        .output()
        .expect("run tcpsim");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown congestion algorithm"),
        "stderr did not name the bad algorithm: {stderr}"
    );
}

#[test]
fn unknown_topology_exits_with_code_one() {
    let output = tcpsim()
        .args(["Reno", "10", "Ring"])
        .output()
        .expect("run tcpsim");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn zero_iterations_exit_with_code_one() {
    let output = tcpsim()
        .args(["Reno", "0", "Direct"])
        .output()
        .expect("run tcpsim");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn direct_run_reports_a_summary_and_appends_csv_rows() {
    let dir = unique_temp_dir("direct");

    let output = tcpsim()
        .args(["tahoe", "20", "direct"])
        .current_dir(&dir)
        .output()
        .expect("run tcpsim");
    assert!(
        output.status.success(),
        "tcpsim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Running TCP Tahoe sender"));
    assert!(stdout.contains("E N D   O F   S E S S I O N"));
    assert!(stdout.contains("Throughput (MB/RTTs):"));

    // Case-insensitive arguments still produce the canonical file name.
    let csv = dir.join("statisticsTahoeDirect.csv");
    let contents = fs::read_to_string(&csv).expect("statistics file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Number of Iterations,"));
    assert!(lines[1].starts_with("20,1,1,Tahoe,"));

    // A second identical run appends one identical row: deterministic.
    let output = tcpsim()
        .args(["tahoe", "20", "direct"])
        .current_dir(&dir)
        .output()
        .expect("run tcpsim again");
    assert!(output.status.success());
    let contents = fs::read_to_string(&csv).expect("statistics file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], lines[2]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cloud_run_with_optional_arguments() {
    let dir = unique_temp_dir("cloud");

    let output = tcpsim()
        .args(["NewReno", "30", "Cloud", "6244", "65536", "4", "1"])
        .current_dir(&dir)
        .output()
        .expect("run tcpsim");
    assert!(
        output.status.success(),
        "tcpsim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Number of Senders: 4"));

    let csv = dir.join("statisticsNewRenoCloud.csv");
    let contents = fs::read_to_string(&csv).expect("statistics file");
    assert!(contents.lines().nth(1).expect("row").starts_with("30,4,1,NewReno,"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn viz_json_flag_writes_cwnd_samples() {
    let dir = unique_temp_dir("viz");
    let viz_path = dir.join("cwnd.json");

    let output = tcpsim()
        .args(["Reno", "10", "Direct"])
        .arg("--viz-json")
        .arg(&viz_path)
        .current_dir(&dir)
        .output()
        .expect("run tcpsim");
    assert!(output.status.success());

    let raw = fs::read_to_string(&viz_path).expect("viz file");
    let v: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let samples = v.as_array().expect("array of samples");
    assert_eq!(samples.len(), 10);
    assert!(samples[0].get("cwnd").and_then(|c| c.as_u64()).is_some());

    let _ = fs::remove_dir_all(&dir);
}
