//! TCP 发送端（拥塞控制核心）
//!
//! 分段、拥塞窗口/慢启动门限/有效窗口、RTO 估计、重传缓冲，
//! 以及 Tahoe / Reno / NewReno 三种算法的状态机。三种算法共用
//! 同一个发送端类型，只在重复 ACK 与恢复逻辑上按算法标签分派。

use std::collections::{BTreeMap, VecDeque};

use super::algorithm::{CongestionAlgorithm, CongestionMode};
use super::rto::RtoEstimator;
use crate::net::{EndpointId, Packet, MSS};
use crate::sim::{SimTime, TimerHandle, TimerKind, TimerRegistry};
use tracing::{debug, trace};

/// 重传缓冲里的一个未确认段。
#[derive(Debug, Clone)]
struct SentSegment {
    len: u32,
    /// 首次发送时刻（RTT 采样用）
    sent_at: SimTime,
    /// Karn 规则：重传过的段不参与 RTT 采样
    retransmitted: bool,
}

/// 发送端统计计数，供 CSV 收集器消费。
#[derive(Debug, Default, Clone, Copy)]
pub struct SenderStats {
    /// 累计发送的载荷字节（含重传）
    pub bytes_transmitted: u64,
    /// 累计重传的载荷字节
    pub bytes_retransmitted: u64,
    /// 超时次数
    pub timeouts: u64,
}

#[derive(Debug)]
pub struct Sender {
    algorithm: CongestionAlgorithm,
    /// 自身端点（定时器回调目标）
    endpoint: EndpointId,
    /// 对端端点（数据段目的地）
    remote: EndpointId,
    mode: CongestionMode,

    /// 拥塞窗口（字节）
    cwnd: u64,
    /// 慢启动门限（字节）
    ssthresh: u64,
    /// 已发送未确认的字节数
    flight_size: u64,
    /// 对端通告的接收窗口
    rwnd: u64,

    /// 最老的未确认字节
    snd_una: u64,
    /// 下一个待发送字节
    snd_nxt: u64,
    /// 历史最高已发送字节
    snd_max: u64,
    /// 进入快速恢复时的最高未确认字节（NewReno 部分 ACK 判定）
    recover: u64,
    /// 连续重复 ACK 计数
    dup_ack_count: u32,

    /// 应用层要发送的总字节数
    total_data_len: u64,
    /// 重传缓冲：seq -> 段
    retransmit_buf: BTreeMap<u64, SentSegment>,

    rto: RtoEstimator,
    rto_timer: Option<TimerHandle>,

    /// 产出的包，由端点搬给链路
    outbox: VecDeque<Packet>,
    stats: SenderStats,
}

/// 初始慢启动门限（64 KiB）。
const INITIAL_SSTHRESH: u64 = 65_536;

impl Sender {
    pub fn new(algorithm: CongestionAlgorithm, endpoint: EndpointId, remote: EndpointId) -> Self {
        Self {
            algorithm,
            endpoint,
            remote,
            mode: CongestionMode::SlowStart,
            cwnd: MSS as u64,
            ssthresh: INITIAL_SSTHRESH,
            flight_size: 0,
            rwnd: INITIAL_SSTHRESH,
            snd_una: 0,
            snd_nxt: 0,
            snd_max: 0,
            recover: 0,
            dup_ack_count: 0,
            total_data_len: 0,
            retransmit_buf: BTreeMap::new(),
            rto: RtoEstimator::default(),
            rto_timer: None,
            outbox: VecDeque::new(),
            stats: SenderStats::default(),
        }
    }

    pub(crate) fn set_remote(&mut self, remote: EndpointId) {
        self.remote = remote;
    }

    /// 应用层交付一个要发送的字节流（只记长度，内容不建模）。
    pub fn start(&mut self, total_bytes: u64) {
        self.total_data_len = total_bytes;
    }

    /// 有效窗口：min(cwnd, rwnd) 扣除在途字节。
    pub fn effective_window(&self) -> u64 {
        self.cwnd.min(self.rwnd).saturating_sub(self.flight_size)
    }

    /// 在窗口允许的范围内持续发出 MSS 大小的段。
    pub fn pump(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        while self.effective_window() >= MSS as u64 && self.snd_nxt < self.total_data_len {
            let remain = self.total_data_len - self.snd_nxt;
            let len = (MSS as u64).min(remain) as u32;
            let seq = self.snd_nxt;

            self.retransmit_buf.insert(
                seq,
                SentSegment {
                    len,
                    sent_at: now,
                    retransmitted: false,
                },
            );
            self.snd_nxt = self.snd_nxt.saturating_add(len as u64);
            self.snd_max = self.snd_max.max(self.snd_nxt);
            self.flight_size = self.flight_size.saturating_add(len as u64);
            self.stats.bytes_transmitted = self.stats.bytes_transmitted.saturating_add(len as u64);

            debug!(
                seq,
                len,
                cwnd = self.cwnd,
                flight = self.flight_size,
                effective = self.effective_window(),
                "发出数据段"
            );
            self.outbox.push_back(Packet::data(self.remote, seq, len));
            self.arm_rto_if_idle(timers, now);
        }
        self.assert_seq_invariants();
    }

    /// 处理一个到达的 ACK。
    pub fn on_ack(&mut self, ack: u64, rwnd: u64, timers: &mut TimerRegistry, now: SimTime) {
        self.rwnd = rwnd;

        if ack > self.snd_una {
            self.handle_new_ack(ack, timers, now);
        } else if ack == self.snd_una {
            self.handle_dup_ack(timers, now);
        } else {
            trace!(ack, snd_una = self.snd_una, "过期 ACK，忽略");
        }
        self.assert_seq_invariants();
    }

    fn handle_new_ack(&mut self, ack: u64, timers: &mut TimerRegistry, now: SimTime) {
        let newly_acked = ack - self.snd_una;
        debug!(
            ack,
            newly_acked,
            mode = ?self.mode,
            cwnd = self.cwnd,
            "新 ACK"
        );

        self.drop_acked_segments(ack, now);
        self.snd_una = ack;
        self.flight_size = self.flight_size.saturating_sub(newly_acked);
        self.dup_ack_count = 0;

        match self.mode {
            CongestionMode::FastRecovery => match self.algorithm {
                CongestionAlgorithm::Reno => {
                    // 窗口收缩：退出快速恢复
                    self.cwnd = self.ssthresh;
                    self.mode = CongestionMode::CongestionAvoidance;
                    debug!(cwnd = self.cwnd, "快速恢复结束（Reno）");
                }
                CongestionAlgorithm::NewReno => {
                    if ack >= self.recover {
                        // 完整 ACK：收缩并退出
                        self.cwnd = self.ssthresh;
                        self.mode = CongestionMode::CongestionAvoidance;
                        debug!(cwnd = self.cwnd, "完整 ACK，快速恢复结束（NewReno）");
                    } else {
                        // 部分 ACK：重传新的 snd_una，按确认量收缩，留在快速恢复
                        debug!(ack, recover = self.recover, "部分 ACK（NewReno）");
                        self.retransmit_front(timers, now);
                        self.cwnd = self.cwnd.saturating_sub(newly_acked).max(MSS as u64);
                    }
                }
                CongestionAlgorithm::Tahoe => {
                    // Tahoe 不进入快速恢复
                }
            },
            CongestionMode::SlowStart => {
                self.cwnd = self.cwnd.saturating_add(MSS as u64);
                if self.cwnd >= self.ssthresh {
                    self.mode = CongestionMode::CongestionAvoidance;
                    debug!(cwnd = self.cwnd, ssthresh = self.ssthresh, "进入拥塞避免");
                }
            }
            CongestionMode::CongestionAvoidance => {
                // 每个 ACK 增长 MSS^2/cwnd，约合每 RTT 一个 MSS
                let mss = MSS as u64;
                let inc = (mss.saturating_mul(mss) / self.cwnd.max(1)).max(1);
                self.cwnd = self.cwnd.saturating_add(inc);
            }
        }

        if self.retransmit_buf.is_empty() {
            self.cancel_rto(timers);
        } else {
            self.restart_rto(timers, now);
        }
        self.pump(timers, now);
    }

    fn handle_dup_ack(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        if self.mode == CongestionMode::FastRecovery {
            // 每个额外的重复 ACK 把窗口再撑开一个 MSS
            self.cwnd = self.cwnd.saturating_add(MSS as u64);
            trace!(cwnd = self.cwnd, "快速恢复中的重复 ACK，窗口膨胀");
            self.pump(timers, now);
            return;
        }

        self.dup_ack_count = self.dup_ack_count.saturating_add(1);
        trace!(dup_ack_count = self.dup_ack_count, snd_una = self.snd_una, "重复 ACK");
        if self.dup_ack_count != 3 {
            // 第三个之外的重复 ACK 在本阶段不触发任何动作
            return;
        }

        self.ssthresh = (self.flight_size / 2).max(2 * MSS as u64);
        match self.algorithm {
            CongestionAlgorithm::Tahoe => {
                self.cwnd = MSS as u64;
                self.mode = CongestionMode::SlowStart;
                debug!(
                    ssthresh = self.ssthresh,
                    "第三个重复 ACK：快速重传，回到慢启动（Tahoe）"
                );
                self.retransmit_front(timers, now);
            }
            CongestionAlgorithm::Reno | CongestionAlgorithm::NewReno => {
                if self.algorithm == CongestionAlgorithm::NewReno {
                    self.recover = self.snd_max;
                }
                self.retransmit_front(timers, now);
                // 三个重复 ACK 意味着三个段已离开网络：窗口按此膨胀
                self.cwnd = self.ssthresh.saturating_add(3 * MSS as u64);
                self.mode = CongestionMode::FastRecovery;
                debug!(
                    ssthresh = self.ssthresh,
                    cwnd = self.cwnd,
                    recover = self.recover,
                    "第三个重复 ACK：快速重传，进入快速恢复"
                );
            }
        }
    }

    /// RTO 到期回调。定时器已由注册表摘除。
    pub fn on_timeout(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        self.rto_timer = None;
        if self.retransmit_buf.is_empty() {
            return;
        }

        self.ssthresh = (self.flight_size / 2).max(2 * MSS as u64);
        self.cwnd = MSS as u64;
        self.rto.on_timeout();
        self.stats.timeouts = self.stats.timeouts.saturating_add(1);
        debug!(
            snd_una = self.snd_una,
            ssthresh = self.ssthresh,
            rto = self.rto.current(),
            timeouts = self.stats.timeouts,
            "重传超时：回到慢启动"
        );

        self.retransmit_front(timers, now);
        self.mode = CongestionMode::SlowStart;
        self.dup_ack_count = 0;
        self.arm_rto_if_idle(timers, now);
    }

    /// 重传 `snd_una` 起始的段。
    fn retransmit_front(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        let seq = self.snd_una;
        let Some(seg) = self.retransmit_buf.get_mut(&seq) else {
            return;
        };
        seg.retransmitted = true;
        let len = seg.len;
        self.stats.bytes_transmitted = self.stats.bytes_transmitted.saturating_add(len as u64);
        self.stats.bytes_retransmitted = self.stats.bytes_retransmitted.saturating_add(len as u64);
        debug!(seq, len, "重传数据段");
        self.outbox.push_back(Packet::data(self.remote, seq, len));
        self.arm_rto_if_idle(timers, now);
    }

    /// 从重传缓冲中移除已被累计确认覆盖的段，并做 RTT 采样。
    fn drop_acked_segments(&mut self, ack: u64, now: SimTime) {
        let mut sample: Option<f64> = None;
        let mut acked = Vec::new();
        for (&seq, seg) in self.retransmit_buf.iter() {
            if seq.saturating_add(seg.len as u64) <= ack {
                acked.push(seq);
                if !seg.retransmitted {
                    // 取最近发送的非重传段作为样本
                    sample = Some(now.0 - seg.sent_at.0);
                }
            } else {
                break;
            }
        }
        for seq in acked {
            self.retransmit_buf.remove(&seq);
        }
        if let Some(r) = sample {
            self.rto.sample(r);
        }
    }

    fn arm_rto_if_idle(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        if self.rto_timer.is_none() {
            let at = now.offset(self.rto.current());
            self.rto_timer = Some(timers.arm(self.endpoint, TimerKind::Rto, at));
        }
    }

    fn restart_rto(&mut self, timers: &mut TimerRegistry, now: SimTime) {
        if let Some(handle) = self.rto_timer.take() {
            timers.cancel(handle);
        }
        self.arm_rto_if_idle(timers, now);
    }

    fn cancel_rto(&mut self, timers: &mut TimerRegistry) {
        if let Some(handle) = self.rto_timer.take() {
            timers.cancel(handle);
        }
    }

    fn assert_seq_invariants(&self) {
        debug_assert!(self.snd_una <= self.snd_nxt && self.snd_nxt <= self.snd_max);
    }

    /// 从 outbox 取走一个待发出的包。
    pub(crate) fn take_packet(&mut self) -> Option<Packet> {
        self.outbox.pop_front()
    }

    pub fn is_done(&self) -> bool {
        self.total_data_len > 0 && self.snd_una >= self.total_data_len
    }

    pub fn algorithm(&self) -> CongestionAlgorithm {
        self.algorithm
    }

    pub fn mode(&self) -> CongestionMode {
        self.mode
    }

    pub fn cwnd(&self) -> u64 {
        self.cwnd
    }

    pub fn ssthresh(&self) -> u64 {
        self.ssthresh
    }

    pub fn flight_size(&self) -> u64 {
        self.flight_size
    }

    pub fn snd_una(&self) -> u64 {
        self.snd_una
    }

    pub fn snd_nxt(&self) -> u64 {
        self.snd_nxt
    }

    pub fn snd_max(&self) -> u64 {
        self.snd_max
    }

    pub fn dup_ack_count(&self) -> u32 {
        self.dup_ack_count
    }

    pub fn rto_estimator(&self) -> &RtoEstimator {
        &self.rto
    }

    pub fn has_rto_timer(&self) -> bool {
        self.rto_timer.is_some()
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }
}
