//! RTO 估计器
//!
//! 标准 SRTT/RTTVAR 平滑加指数退避。单位都是 tick。
//! Karn 规则由发送端保证：重传过的段不会送样本进来。

use tracing::debug;

/// RTO 下限（tick）
pub const MIN_RTO: f64 = 1.0;
/// RTO 上限（tick）
pub const MAX_RTO: f64 = 60.0;
/// 首个样本到来之前的初始 RTO
pub const INITIAL_RTO: f64 = 3.0;

#[derive(Debug)]
pub struct RtoEstimator {
    srtt: Option<f64>,
    rttvar: f64,
    /// 平滑得到的基准 RTO（未含退避）
    rto: f64,
    /// 指数退避倍数，超时翻倍、新样本归一
    backoff: u32,
}

impl Default for RtoEstimator {
    fn default() -> Self {
        Self {
            srtt: None,
            rttvar: 0.0,
            rto: INITIAL_RTO,
            backoff: 1,
        }
    }
}

impl RtoEstimator {
    /// 接收一个 RTT 样本 `r`（tick）。
    pub fn sample(&mut self, r: f64) {
        match self.srtt {
            None => {
                self.srtt = Some(r);
                self.rttvar = r / 2.0;
            }
            Some(srtt) => {
                self.rttvar = 0.75 * self.rttvar + 0.25 * (srtt - r).abs();
                self.srtt = Some(0.875 * srtt + 0.125 * r);
            }
        }
        let srtt = self.srtt.expect("srtt just set");
        self.rto = (srtt + 4.0 * self.rttvar).clamp(MIN_RTO, MAX_RTO);
        self.backoff = 1;
        debug!(
            sample = r,
            srtt,
            rttvar = self.rttvar,
            rto = self.rto,
            "RTT 样本更新"
        );
    }

    /// 超时退避：有效 RTO 翻倍，封顶 `MAX_RTO`。
    pub fn on_timeout(&mut self) {
        if self.current() < MAX_RTO {
            self.backoff = self.backoff.saturating_mul(2);
        }
        debug!(backoff = self.backoff, rto = self.current(), "RTO 指数退避");
    }

    /// 当前有效 RTO（含退避，夹在 [MIN_RTO, MAX_RTO]）。
    pub fn current(&self) -> f64 {
        (self.rto * self.backoff as f64).clamp(MIN_RTO, MAX_RTO)
    }

    pub fn srtt(&self) -> Option<f64> {
        self.srtt
    }

    pub fn rttvar(&self) -> f64 {
        self.rttvar
    }
}
