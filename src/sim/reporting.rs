//! Reporting flags for per-component console tracing.
//!
//! Each bit enables debug-level output for one component family. The mask is
//! translated into a `tracing` EnvFilter directive string; `RUST_LOG`
//! overrides it when set.

/// Reports the activities of the simulator runtime (per-RTT banners).
pub const REPORTING_SIMULATOR: u32 = 1 << 1;

/// Reports the activities of communication links.
pub const REPORTING_LINKS: u32 = 1 << 2;

/// Reports the activities of routers (queueing, forwarding, drops).
pub const REPORTING_ROUTERS: u32 = 1 << 3;

/// Reports the activities of TCP senders.
pub const REPORTING_SENDERS: u32 = 1 << 4;

/// Reports the activities of TCP receivers.
pub const REPORTING_RECEIVERS: u32 = 1 << 5;

/// Reports the activities of the RTO estimator.
pub const REPORTING_RTO: u32 = 1 << 6;

/// Default reporting level, as the simulator historically shipped.
pub const DEFAULT_REPORTING: u32 =
    REPORTING_SIMULATOR | REPORTING_LINKS | REPORTING_ROUTERS | REPORTING_SENDERS;

/// Builds an EnvFilter directive string for the given mask.
pub fn env_filter_directives(mask: u32) -> String {
    let mut filter = String::from("info");
    let targets: [(u32, &str); 6] = [
        (REPORTING_SIMULATOR, "tcpsim_rs::sim::scheduler"),
        (REPORTING_LINKS, "tcpsim_rs::net::link"),
        (REPORTING_ROUTERS, "tcpsim_rs::net::router"),
        (REPORTING_SENDERS, "tcpsim_rs::tcp::sender"),
        (REPORTING_RECEIVERS, "tcpsim_rs::tcp::receiver"),
        (REPORTING_RTO, "tcpsim_rs::tcp::rto"),
    ];
    for (bit, target) in targets {
        if mask & bit != 0 {
            filter.push(',');
            filter.push_str(target);
            filter.push_str("=debug");
        }
    }
    filter
}
