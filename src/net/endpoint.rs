//! 端点
//!
//! 把一个发送端和一个接收端绑到同一条链路上。入站包按类别分流：
//! ACK 交给发送端，数据段交给接收端并立即回 ACK。

use std::collections::VecDeque;

use super::id::{EndpointId, LinkId, NetRef};
use super::link::Link;
use super::packet::{Packet, PacketKind};
use crate::sim::{SimTime, TimerRegistry};
use crate::tcp::{CongestionAlgorithm, Receiver, Sender};

/// `process` 的阶段选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointPhase {
    /// mode = 1：处理刚到的 ACK，并按窗口发出新数据段。
    Send = 1,
    /// mode = 2：接收数据段并发出 ACK。
    Receive = 2,
}

/// 网络端点
#[derive(Debug)]
pub struct Endpoint {
    pub id: EndpointId,
    name: String,
    link: Option<LinkId>,
    sender: Sender,
    receiver: Receiver,
    /// 链路投递来、尚未处理的包
    inbox: VecDeque<Packet>,
}

impl Endpoint {
    pub fn new(
        id: EndpointId,
        name: impl Into<String>,
        algorithm: CongestionAlgorithm,
        rcv_window: u64,
    ) -> Self {
        // 对端在配对时再设置
        Self {
            id,
            name: name.into(),
            link: None,
            sender: Sender::new(algorithm, id, id),
            receiver: Receiver::new(id, rcv_window),
            inbox: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_link(&mut self, link: LinkId) {
        self.link = Some(link);
    }

    pub fn link(&self) -> LinkId {
        self.link
            .unwrap_or_else(|| panic!("endpoint {} is not attached to a link", self.name))
    }

    pub(crate) fn set_remote(&mut self, remote: EndpointId) {
        self.sender.set_remote(remote);
        self.receiver.set_remote(remote);
    }

    /// 链路投递一个到达的包。
    pub(crate) fn deliver(&mut self, pkt: Packet) {
        self.inbox.push_back(pkt);
    }

    /// 应用层启动一次数据传输：发送端立刻按初始窗口发出首批段。
    pub fn start_flow(
        &mut self,
        total_bytes: u64,
        link: &mut Link,
        timers: &mut TimerRegistry,
        now: SimTime,
    ) {
        self.sender.start(total_bytes);
        self.sender.pump(timers, now);
        self.flush_sender(link);
    }

    /// 驱动端点一个阶段。
    pub fn process(
        &mut self,
        phase: EndpointPhase,
        link: &mut Link,
        timers: &mut TimerRegistry,
        now: SimTime,
    ) {
        self.dispatch_inbox(link, timers, now);
        if phase == EndpointPhase::Send {
            self.sender.pump(timers, now);
        }
        self.flush_sender(link);
    }

    /// RTO 到期：让发送端重传并把产生的段交给链路。
    pub(crate) fn on_rto(&mut self, link: &mut Link, timers: &mut TimerRegistry, now: SimTime) {
        self.sender.on_timeout(timers, now);
        self.flush_sender(link);
    }

    fn dispatch_inbox(&mut self, link: &mut Link, timers: &mut TimerRegistry, now: SimTime) {
        while let Some(pkt) = self.inbox.pop_front() {
            match pkt.kind {
                PacketKind::Ack { ack, rwnd } => {
                    self.sender.on_ack(ack, rwnd, timers, now);
                }
                PacketKind::Data { seq, len } => {
                    let reply = self.receiver.on_data(seq, len);
                    link.submit(NetRef::Endpoint(self.id), reply);
                }
            }
        }
    }

    fn flush_sender(&mut self, link: &mut Link) {
        while let Some(pkt) = self.sender.take_packet() {
            link.submit(NetRef::Endpoint(self.id), pkt);
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn sender_mut(&mut self) -> &mut Sender {
        &mut self.sender
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}
