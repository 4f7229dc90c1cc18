//! 路由器
//!
//! 有界字节预算的 FIFO 队列加目的端点索引的转发表。
//! 数据段入队超出预算即尾丢弃（静默，靠超时环路恢复）；
//! ACK 走旁路入队，不计预算、永不丢弃，但仍保持 FIFO 顺序。

use std::collections::HashMap;

use super::id::{EndpointId, LinkId, NetRef, RouterId};
use super::link::Link;
use super::packet::{Packet, MSS};
use crate::queue::{DropTailQueue, PacketQueue};
use tracing::{debug, trace};

/// 默认路由器缓冲：六个数据段再加一点 ACK 的余量。
pub const DEFAULT_BUFFER_BYTES: u64 = 6 * MSS as u64 + 100;

/// 路由器节点
#[derive(Debug)]
pub struct Router {
    pub id: RouterId,
    name: String,
    queue: Box<dyn PacketQueue>,
    /// 转发表：目的端点 -> 出口链路
    table: HashMap<EndpointId, LinkId>,
    /// 因缓冲溢出而丢弃的包数
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
}

impl Router {
    pub fn new(id: RouterId, name: impl Into<String>, buffer_bytes: u64) -> Self {
        Self {
            id,
            name: name.into(),
            queue: Box::new(DropTailQueue::new(buffer_bytes)),
            table: HashMap::new(),
            dropped_pkts: 0,
            dropped_bytes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 配置转发表项。
    pub fn add_route(&mut self, dst: EndpointId, via: LinkId) {
        self.table.insert(dst, via);
    }

    pub fn queue_bytes(&self) -> u64 {
        self.queue.bytes()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// 链路投递来一个包。数据段可能被尾丢弃；ACK 旁路入队。
    pub fn receive(&mut self, pkt: Packet) {
        if pkt.is_ack() {
            trace!(router = %self.name, "ACK 旁路入队");
            self.queue.enqueue_free(pkt);
            return;
        }
        match self.queue.enqueue(pkt) {
            Ok(()) => {
                trace!(
                    router = %self.name,
                    q_len = self.queue.len(),
                    q_bytes = self.queue.bytes(),
                    "packet 入队成功"
                );
            }
            Err(pkt) => {
                self.dropped_pkts = self.dropped_pkts.saturating_add(1);
                self.dropped_bytes = self.dropped_bytes.saturating_add(pkt.size_bytes as u64);
                debug!(
                    router = %self.name,
                    q_bytes = self.queue.bytes(),
                    capacity = self.queue.capacity_bytes(),
                    size_bytes = pkt.size_bytes,
                    dropped_pkts = self.dropped_pkts,
                    "队列已满，DropTail 丢弃 packet"
                );
            }
        }
    }

    /// mode = 0：转发队头的包。
    ///
    /// 每次调用对同一条出口链路至多交付一个包；FIFO 严格保序，
    /// 队头的出口被占用时即停止（不越过队头转发后面的包）。
    pub fn process(&mut self, links: &mut [Link]) {
        let mut used: Vec<LinkId> = Vec::new();
        while let Some(head) = self.queue.peek() {
            let link_id = *self.table.get(&head.dst).unwrap_or_else(|| {
                panic!(
                    "router {}: no forwarding entry for endpoint {:?}",
                    self.name, head.dst
                )
            });
            if used.contains(&link_id) {
                break;
            }
            let pkt = self.queue.dequeue().expect("head just peeked");
            debug!(
                router = %self.name,
                link = links[link_id.0].name(),
                dst = ?pkt.dst,
                is_ack = pkt.is_ack(),
                "转发队头 packet"
            );
            links[link_id.0].submit(NetRef::Router(self.id), pkt);
            used.push(link_id);
        }
    }
}
