//! DropTail（尾丢弃）队列
//!
//! 当队列容量不足时，直接丢弃新到达的 packet。
//! ACK 经由 `enqueue_free` 入队，不占用字节预算。

use std::collections::VecDeque;

use crate::net::Packet;

use super::PacketQueue;

#[derive(Debug)]
struct Queued {
    pkt: Packet,
    /// 入队时计入预算的字节数（ACK 旁路为 0）
    charged_bytes: u64,
}

#[derive(Debug)]
pub struct DropTailQueue {
    max_bytes: u64,
    cur_bytes: u64,
    q: VecDeque<Queued>,
}

impl DropTailQueue {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            cur_bytes: 0,
            q: VecDeque::new(),
        }
    }
}

impl PacketQueue for DropTailQueue {
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet> {
        let sz = pkt.size_bytes as u64;
        if self.cur_bytes.saturating_add(sz) > self.max_bytes {
            return Err(pkt);
        }
        self.cur_bytes = self.cur_bytes.saturating_add(sz);
        self.q.push_back(Queued {
            pkt,
            charged_bytes: sz,
        });
        Ok(())
    }

    fn enqueue_free(&mut self, pkt: Packet) {
        self.q.push_back(Queued {
            pkt,
            charged_bytes: 0,
        });
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let item = self.q.pop_front()?;
        self.cur_bytes = self.cur_bytes.saturating_sub(item.charged_bytes);
        Some(item.pkt)
    }

    fn peek(&self) -> Option<&Packet> {
        self.q.front().map(|item| &item.pkt)
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }

    fn capacity_bytes(&self) -> u64 {
        self.max_bytes
    }
}
