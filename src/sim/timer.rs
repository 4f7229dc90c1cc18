//! 定时器注册表
//!
//! 调度器持有所有挂起的定时器；组件只持有 `TimerHandle`。
//! 每个发送端同一时刻至多存在一个 RTO 定时器。

use super::time::SimTime;
use crate::net::EndpointId;
use tracing::trace;

/// 定时器回调类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// 重传超时
    Rto,
}

/// 定时器句柄：组件用它来取消一个正在运行的定时器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(pub u64);

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    at: SimTime,
    target: EndpointId,
    kind: TimerKind,
}

/// 挂起定时器的有序列表（按加入顺序遍历，保证确定性）。
#[derive(Debug, Default)]
pub struct TimerRegistry {
    next_handle: u64,
    timers: Vec<Timer>,
}

impl TimerRegistry {
    /// 注册一个在 `at` 时刻触发的定时器。
    ///
    /// 同一 (target, kind) 重复注册属于配置错误，直接 panic。
    pub fn arm(&mut self, target: EndpointId, kind: TimerKind, at: SimTime) -> TimerHandle {
        if self.is_armed(target, kind) {
            panic!(
                "TimerRegistry::arm: timer {:?} for endpoint {:?} is already armed",
                kind, target
            );
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        trace!(?handle, ?target, ?kind, at = at.0, "注册定时器");
        self.timers.push(Timer {
            handle,
            at,
            target,
            kind,
        });
        handle
    }

    /// 取消一个正在运行的定时器。
    ///
    /// 取消不存在的定时器属于配置错误，直接 panic。
    pub fn cancel(&mut self, handle: TimerHandle) {
        let Some(pos) = self.timers.iter().position(|t| t.handle == handle) else {
            panic!(
                "TimerRegistry::cancel: attempting to cancel a non-existing timer {:?}",
                handle
            );
        };
        trace!(?handle, "取消定时器");
        self.timers.remove(pos);
    }

    pub fn is_armed(&self, target: EndpointId, kind: TimerKind) -> bool {
        self.timers
            .iter()
            .any(|t| t.target == target && t.kind == kind)
    }

    /// 摘除 `target` 上所有已到期（at <= now）的定时器并返回其类别。
    ///
    /// 调用方随后逐个触发回调；先摘除再触发，使回调内可以安全地
    /// 重新注册同类定时器。
    pub fn take_expired(&mut self, target: EndpointId, now: SimTime) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].target == target && self.timers[i].at.0 <= now.0 {
                let t = self.timers.remove(i);
                trace!(handle = ?t.handle, ?target, at = t.at.0, now = now.0, "定时器到期");
                fired.push(t.kind);
            } else {
                i += 1;
            }
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
