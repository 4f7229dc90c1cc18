//! tick 调度器
//!
//! 仿真按整数 tick 推进（一轮名义上是一个 RTT）。每个 tick 内
//! 以固定的阶段顺序驱动链路、端点、路由器，消除并发事件的歧义；
//! 每次端点操作之后立即检查该端点发送端的到期定时器——这是
//! 唯一的定时器触发点。

use super::time::SimTime;
use super::timer::{TimerKind, TimerRegistry};
use crate::net::{EndpointId, EndpointPhase, LinkPhase, Network};
use crate::topo::{CloudTopology, DirectTopology, Topology};
use crate::viz::{CwndLogger, CwndSample};
use tracing::{debug, info};

/// 每个发送端要传输的应用层数据量（字节）。
/// 实际系统里这应当来自文件或输入流。
pub const TOTAL_DATA_LENGTH: u64 = 1_000_000;

/// tick 调度器：持有仿真时钟与定时器注册表。
pub struct Simulator {
    now: SimTime,
    timers: TimerRegistry,
    /// 可选的拥塞参数采样器
    pub viz: Option<CwndLogger>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            now: SimTime::START,
            timers: TimerRegistry::default(),
            viz: None,
        }
    }
}

impl Simulator {
    /// 当前仿真时间。
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// 运行给定数量的传输轮次。
    ///
    /// 先让每个发送端点拿到输入流并发出首批段（系统之后靠 ACK
    /// 自计时），再逐 tick 执行拓扑对应的阶段序列。
    pub fn run(&mut self, topo: &mut Topology, iterations: u64, total_bytes: u64) {
        info!(
            algorithm = %topo.algorithm(),
            topology = %topo.kind(),
            iterations,
            "▶️  开始 TCP 拥塞控制仿真"
        );

        for id in topo.sender_endpoints() {
            topo.net_mut()
                .start_flow(id, total_bytes, &mut self.timers, self.now);
        }

        for _ in 0..iterations {
            debug!(
                "Start of RTT #{} ................................................",
                self.now.tick_number()
            );

            match topo {
                Topology::Direct(t) => self.tick_direct(t),
                Topology::Cloud(t) => self.tick_cloud(t),
            }
            self.sample_senders(topo);

            debug!(
                "End of RTT #{}   ------------------------------------------------",
                self.now.tick_number()
            );
            self.now = self.now.offset(1.0);
        }

        info!(final_tick = self.now.tick_number(), "✅ 仿真结束");
    }

    /// Direct 拓扑的一个 tick。
    fn tick_direct(&mut self, t: &mut DirectTopology) {
        let n = t.routers.len();

        // 先让发送端一侧的链路送达，再让发送端处理上一轮回来的 ACK。
        t.net.process_link(t.links[0], LinkPhase::Deliver);
        self.endpoint_step(&mut t.net, t.sender, EndpointPhase::Send);
        t.net.process_link(t.links[0], LinkPhase::Transmit);

        // 正向遍历路由器，数据段朝接收端推进。
        for i in 0..n {
            if i > 0 {
                t.net.process_link(t.links[i], LinkPhase::Deliver);
            }
            t.net.process_router(t.routers[i]);
            if i > 0 && i < n - 1 {
                t.net.process_link(t.links[i], LinkPhase::Transmit);
            }
        }

        // 接收端收数据、出 ACK。
        t.net.process_link(t.links[n], LinkPhase::Deliver);
        self.endpoint_step(&mut t.net, t.receiver, EndpointPhase::Receive);
        t.net.process_link(t.links[n], LinkPhase::Transmit);

        // 回程：从接收端一侧反向遍历到路由器 0。
        for i in (0..n).rev() {
            t.net.process_router(t.routers[i]);
            t.net.process_link(t.links[i], LinkPhase::Transmit);
        }
    }

    /// Cloud 拓扑的一个 tick。与 Direct 同构，只是两端各有一组链路。
    fn tick_cloud(&mut self, t: &mut CloudTopology) {
        let n = t.routers.len();

        for &link in &t.client_links {
            t.net.process_link(link, LinkPhase::Deliver);
        }
        for &client in &t.clients {
            self.endpoint_step(&mut t.net, client, EndpointPhase::Send);
        }
        for &link in &t.client_links {
            t.net.process_link(link, LinkPhase::Transmit);
        }

        for i in 0..n {
            if i > 0 {
                t.net.process_link(t.chain_links[i - 1], LinkPhase::Deliver);
            }
            t.net.process_router(t.routers[i]);
            if i > 0 && i < n - 1 {
                t.net.process_link(t.chain_links[i - 1], LinkPhase::Transmit);
            }
        }

        for &link in &t.server_links {
            t.net.process_link(link, LinkPhase::Deliver);
        }
        for &server in &t.servers {
            self.endpoint_step(&mut t.net, server, EndpointPhase::Receive);
        }
        for &link in &t.server_links {
            t.net.process_link(link, LinkPhase::Transmit);
        }

        for i in (0..n).rev() {
            t.net.process_router(t.routers[i]);
            if i > 0 {
                t.net.process_link(t.chain_links[i - 1], LinkPhase::Transmit);
            }
        }
        for &link in &t.client_links {
            t.net.process_link(link, LinkPhase::Transmit);
        }
    }

    /// 驱动一个端点并随即触发它的到期定时器。
    fn endpoint_step(&mut self, net: &mut Network, id: EndpointId, phase: EndpointPhase) {
        net.process_endpoint(id, phase, &mut self.timers, self.now);
        for kind in self.timers.take_expired(id, self.now) {
            match kind {
                TimerKind::Rto => net.fire_rto(id, &mut self.timers, self.now),
            }
        }
    }

    /// 记录每个发送端本轮结束时的拥塞参数。
    fn sample_senders(&mut self, topo: &Topology) {
        for id in topo.sender_endpoints() {
            let sender = topo.net().endpoint(id).sender();
            debug!(
                tick = self.now.tick_number(),
                endpoint = id.0,
                cwnd = sender.cwnd(),
                effective_window = sender.effective_window(),
                flight_size = sender.flight_size(),
                ssthresh = sender.ssthresh(),
                "拥塞参数"
            );
            if let Some(viz) = self.viz.as_mut() {
                viz.record(CwndSample {
                    tick: self.now.tick_number(),
                    endpoint: id.0,
                    cwnd: sender.cwnd(),
                    effective_window: sender.effective_window(),
                    flight_size: sender.flight_size(),
                    ssthresh: sender.ssthresh(),
                });
            }
        }
    }
}
