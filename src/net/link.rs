//! 链路类型
//!
//! 链路两端各接一个网络元素（端点或路由器），双向承载在途包。
//! 相邻元素通过 `submit` 把包交给链路，剩余时延立即记为
//! `t_x + t_p`（tick 的小数倍）；之后每次 `process` 调用都衰减 1.0，
//! 接收阶段把衰减到 0 的包按 FIFO 投递给各自的去向端。
//! 链路本身从不丢包——与满载路由器相遇的丢弃记在路由器头上。

use std::collections::VecDeque;

use super::endpoint::Endpoint;
use super::id::{LinkId, NetRef};
use super::packet::Packet;
use super::router::Router;
use tracing::{debug, trace};

/// `process` 的阶段选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPhase {
    /// mode = 1：发送阶段，推进在途包。
    Transmit = 1,
    /// mode = 2：接收阶段，投递已到达的包。
    Deliver = 2,
}

#[derive(Debug)]
struct InFlight {
    pkt: Packet,
    toward: NetRef,
    /// 剩余时延（tick）
    remaining: f64,
}

/// 网络链路
#[derive(Debug)]
pub struct Link {
    pub id: LinkId,
    name: String,
    a: NetRef,
    b: NetRef,
    tx_delay: f64,
    prop_delay: f64,
    in_flight: VecDeque<InFlight>,
}

impl Link {
    pub fn new(
        id: LinkId,
        name: impl Into<String>,
        a: NetRef,
        b: NetRef,
        tx_delay: f64,
        prop_delay: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            a,
            b,
            tx_delay,
            prop_delay,
            in_flight: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 链路对端。`from` 必须是链路的一端，否则属于接线错误。
    fn opposite(&self, from: NetRef) -> NetRef {
        if from == self.a {
            self.b
        } else if from == self.b {
            self.a
        } else {
            panic!(
                "link {}: element {:?} is not attached to this link",
                self.name, from
            );
        }
    }

    /// 由相邻元素提交一个包。包立即上链路，剩余时延 = t_x + t_p。
    pub fn submit(&mut self, from: NetRef, pkt: Packet) {
        let toward = self.opposite(from);
        let remaining = self.tx_delay + self.prop_delay;
        trace!(
            link = %self.name,
            ?from,
            ?toward,
            size_bytes = pkt.size_bytes,
            remaining,
            "packet 上链路"
        );
        self.in_flight.push_back(InFlight {
            pkt,
            toward,
            remaining,
        });
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// 驱动链路一个阶段。每次调用都衰减所有在途包的剩余时延；
    /// 只有接收阶段才投递已到达（remaining <= 0）的包。
    pub fn process(&mut self, phase: LinkPhase, endpoints: &mut [Endpoint], routers: &mut [Router]) {
        for f in &mut self.in_flight {
            f.remaining -= 1.0;
        }

        if phase == LinkPhase::Deliver {
            let mut i = 0;
            while i < self.in_flight.len() {
                if self.in_flight[i].remaining <= 0.0 {
                    let f = self.in_flight.remove(i).expect("index checked");
                    debug!(
                        link = %self.name,
                        toward = ?f.toward,
                        size_bytes = f.pkt.size_bytes,
                        "packet 到达链路末端"
                    );
                    match f.toward {
                        NetRef::Endpoint(e) => endpoints[e.0].deliver(f.pkt),
                        NetRef::Router(r) => routers[r.0].receive(f.pkt),
                    }
                } else {
                    i += 1;
                }
            }
        }
    }
}
