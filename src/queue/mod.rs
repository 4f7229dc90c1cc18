//! 队列策略（Queue disciplines）
//!
//! 路由器使用 DropTail（尾丢弃）队列；trait 抽象保留给后续的
//! RED/CoDel 等策略扩展。

use crate::net::Packet;

mod drop_tail;

pub use drop_tail::DropTailQueue;

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug {
    /// 入队：成功返回 Ok；若被丢弃则返回 Err(pkt)
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet>;
    /// 入队但不计入字节预算（ACK 旁路使用），永不失败
    fn enqueue_free(&mut self, pkt: Packet);
    /// 出队：按队列策略返回下一个 packet
    fn dequeue(&mut self) -> Option<Packet>;
    /// 查看队头 packet（不出队）
    fn peek(&self) -> Option<&Packet>;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn bytes(&self) -> u64;
    fn capacity_bytes(&self) -> u64;
}
