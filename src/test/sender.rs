use crate::net::{PacketKind, EndpointId, MSS};
use crate::sim::{SimTime, TimerRegistry};
use crate::tcp::{CongestionAlgorithm, CongestionMode, Sender};

const M: u64 = MSS as u64;
const RWND: u64 = 65_536;

pub(super) fn new_sender(algorithm: CongestionAlgorithm) -> (Sender, TimerRegistry) {
    let mut sender = Sender::new(algorithm, EndpointId(0), EndpointId(1));
    sender.start(1_000_000);
    (sender, TimerRegistry::default())
}

pub(super) fn drain_data_seqs(sender: &mut Sender) -> Vec<u64> {
    let mut seqs = Vec::new();
    while let Some(pkt) = sender.take_packet() {
        match pkt.kind {
            PacketKind::Data { seq, .. } => seqs.push(seq),
            PacketKind::Ack { .. } => panic!("sender must not emit ACKs"),
        }
    }
    seqs
}

/// Acknowledges delivered data one MSS at a time until `upto`, letting the
/// sender grow its window and keep the pipe full.
pub(super) fn ack_ladder(sender: &mut Sender, timers: &mut TimerRegistry, upto: u64, now: SimTime) {
    let mut ack = sender.snd_una() + M;
    while ack <= upto {
        sender.on_ack(ack, RWND, timers, now);
        drain_data_seqs(sender);
        ack += M;
    }
}

#[test]
fn initial_window_admits_exactly_one_segment() {
    let (mut sender, mut timers) = new_sender(CongestionAlgorithm::Tahoe);
    sender.pump(&mut timers, SimTime::START);

    assert_eq!(drain_data_seqs(&mut sender), vec![0]);
    assert_eq!(sender.cwnd(), M);
    assert_eq!(sender.flight_size(), M);
    assert_eq!(sender.snd_nxt(), M);
    assert_eq!(sender.effective_window(), 0);
    assert!(sender.has_rto_timer());
}

#[test]
fn slow_start_grows_cwnd_one_mss_per_ack() {
    let (mut sender, mut timers) = new_sender(CongestionAlgorithm::Reno);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);

    sender.on_ack(M, RWND, &mut timers, SimTime(2.0));
    assert_eq!(sender.cwnd(), 2 * M);
    assert_eq!(sender.mode(), CongestionMode::SlowStart);
    // One segment acknowledged, window doubled: two new segments go out.
    assert_eq!(drain_data_seqs(&mut sender), vec![M, 2 * M]);

    sender.on_ack(2 * M, RWND, &mut timers, SimTime(3.0));
    assert_eq!(sender.cwnd(), 3 * M);
    assert_eq!(drain_data_seqs(&mut sender), vec![3 * M, 4 * M]);
}

#[test]
fn receiver_window_caps_the_effective_window() {
    let (mut sender, mut timers) = new_sender(CongestionAlgorithm::Reno);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);

    // The peer advertises a two-segment window; cwnd alone would allow more.
    for _ in 0..5 {
        let ack = sender.snd_una() + M;
        sender.on_ack(ack, 2 * M, &mut timers, SimTime(2.0));
        drain_data_seqs(&mut sender);
    }
    assert!(sender.cwnd() > 2 * M);
    assert!(sender.flight_size() <= 2 * M);
}

#[test]
fn congestion_avoidance_grows_about_one_mss_per_window() {
    let (mut sender, mut timers) = new_sender(CongestionAlgorithm::Reno);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);

    // Ride slow start all the way to the initial ssthresh (64 KiB).
    ack_ladder(&mut sender, &mut timers, 64 * M, SimTime(2.0));
    assert_eq!(sender.mode(), CongestionMode::CongestionAvoidance);
    let cwnd = sender.cwnd();
    assert!(cwnd >= sender.ssthresh());

    // One further ACK adds MSS^2/cwnd.
    let ack = sender.snd_una() + M;
    sender.on_ack(ack, RWND, &mut timers, SimTime(3.0));
    drain_data_seqs(&mut sender);
    assert_eq!(sender.cwnd(), cwnd + (M * M / cwnd).max(1));
}

#[test]
fn trailing_segment_shorter_than_mss_is_sent() {
    let mut sender = Sender::new(CongestionAlgorithm::Tahoe, EndpointId(0), EndpointId(1));
    let mut timers = TimerRegistry::default();
    sender.start(M + 100);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);

    sender.on_ack(M, RWND, &mut timers, SimTime(2.0));
    let pkt = sender.take_packet().expect("trailing segment");
    assert_eq!(pkt.payload_len(), 100);
    assert_eq!(sender.snd_nxt(), M + 100);
}

#[test]
fn transfer_completes_and_cancels_the_rto_timer() {
    let mut sender = Sender::new(CongestionAlgorithm::Reno, EndpointId(0), EndpointId(1));
    let mut timers = TimerRegistry::default();
    sender.start(2 * M);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);

    sender.on_ack(M, RWND, &mut timers, SimTime(2.0));
    drain_data_seqs(&mut sender);
    assert!(sender.has_rto_timer());

    sender.on_ack(2 * M, RWND, &mut timers, SimTime(3.0));
    assert!(sender.is_done());
    assert!(!sender.has_rto_timer());
    assert!(timers.is_empty());
    assert_eq!(sender.flight_size(), 0);
}

#[test]
fn counters_track_payload_bytes() {
    let (mut sender, mut timers) = new_sender(CongestionAlgorithm::Reno);
    sender.pump(&mut timers, SimTime::START);
    drain_data_seqs(&mut sender);
    ack_ladder(&mut sender, &mut timers, 4 * M, SimTime(2.0));

    let stats = sender.stats();
    assert_eq!(stats.bytes_transmitted, sender.snd_nxt());
    assert_eq!(stats.bytes_retransmitted, 0);
    assert_eq!(stats.timeouts, 0);
}
