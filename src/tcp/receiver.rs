//! TCP 接收端
//!
//! 维护最高的按序字节 `rcv_nxt`，对每个到达的数据段回一个累计 ACK。
//! 乱序到达只做登记（载荷丢弃），用于缩小通告窗口并产生重复 ACK。

use std::collections::BTreeMap;

use crate::net::{EndpointId, Packet};
use tracing::debug;

#[derive(Debug)]
pub struct Receiver {
    /// ACK 的目的端点（对端）
    remote: EndpointId,
    /// 期望的下一个按序字节
    rcv_nxt: u64,
    /// 接收缓冲大小（字节）
    rcv_window: u64,
    /// 乱序段登记：seq -> len
    out_of_order: BTreeMap<u64, u32>,
    ooo_bytes: u64,
    /// 上一个发出的 ACK 号（用于重复 ACK 判定）
    last_ack: u64,
}

impl Receiver {
    pub fn new(remote: EndpointId, rcv_window: u64) -> Self {
        Self {
            remote,
            rcv_nxt: 0,
            rcv_window,
            out_of_order: BTreeMap::new(),
            ooo_bytes: 0,
            last_ack: 0,
        }
    }

    pub(crate) fn set_remote(&mut self, remote: EndpointId) {
        self.remote = remote;
    }

    /// 已按序交付给应用层的字节数。
    pub fn delivered_bytes(&self) -> u64 {
        self.rcv_nxt
    }

    pub fn out_of_order_bytes(&self) -> u64 {
        self.ooo_bytes
    }

    /// 处理一个数据段并产生回应的 ACK。
    ///
    /// 按序到达推进 `rcv_nxt` 并吸收已缓存的连续乱序段；
    /// 超前到达只登记；落后到达（已交付数据的重传）静默接受。
    pub fn on_data(&mut self, seq: u64, len: u32) -> Packet {
        if seq == self.rcv_nxt {
            self.rcv_nxt = self.rcv_nxt.saturating_add(len as u64);
            self.absorb_contiguous();
        } else if seq > self.rcv_nxt {
            if !self.out_of_order.contains_key(&seq) {
                self.out_of_order.insert(seq, len);
                self.ooo_bytes = self.ooo_bytes.saturating_add(len as u64);
            }
        }
        // seq < rcv_nxt：已交付数据的重传，照常回 ACK。

        let rwnd = self.rcv_window.saturating_sub(self.ooo_bytes);
        let duplicate = self.rcv_nxt == self.last_ack;
        debug!(
            seq,
            len,
            rcv_nxt = self.rcv_nxt,
            rwnd,
            duplicate,
            "数据段处理完毕，发出累计 ACK"
        );
        self.last_ack = self.rcv_nxt;
        Packet::ack(self.remote, self.rcv_nxt, rwnd)
    }

    /// 把与 `rcv_nxt` 连续的乱序段并入按序流。
    fn absorb_contiguous(&mut self) {
        while let Some((&seq, &len)) = self.out_of_order.first_key_value() {
            if seq > self.rcv_nxt {
                break;
            }
            self.out_of_order.remove(&seq);
            self.ooo_bytes = self.ooo_bytes.saturating_sub(len as u64);
            if seq == self.rcv_nxt {
                self.rcv_nxt = self.rcv_nxt.saturating_add(len as u64);
            }
            // seq < rcv_nxt 的登记项是重叠重传，丢掉即可。
        }
    }
}
