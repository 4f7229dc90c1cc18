//! 拓扑构建
//!
//! Direct（线性链）与 Cloud（多客户端汇聚）两种拓扑。
//! 拓扑负责创建并接线所有网络元素，并记住调度所需的遍历顺序。

mod cloud;
mod direct;

use std::fmt;
use std::str::FromStr;

pub use cloud::{build_cloud, CloudTopology};
pub use direct::{build_direct, DirectTopology};

use crate::net::{EndpointId, Network, DEFAULT_BUFFER_BYTES};
use crate::tcp::{CongestionAlgorithm, SenderStats};
use thiserror::Error;

/// 拓扑种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    Direct,
    Cloud,
}

#[derive(Debug, Error)]
#[error("unknown topology: {0} (expected Direct or Cloud)")]
pub struct UnknownTopology(String);

impl FromStr for TopologyKind {
    type Err = UnknownTopology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(TopologyKind::Direct),
            "cloud" => Ok(TopologyKind::Cloud),
            _ => Err(UnknownTopology(s.to_string())),
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopologyKind::Direct => "Direct",
            TopologyKind::Cloud => "Cloud",
        })
    }
}

/// 拓扑构建参数。
#[derive(Debug, Clone)]
pub struct TopologyOpts {
    pub algorithm: CongestionAlgorithm,
    /// 路由器缓冲（字节）
    pub buffer_bytes: u64,
    /// 接收窗口（字节）
    pub rcv_window: u64,
    /// 客户端数量（Cloud 拓扑）
    pub num_clients: usize,
    /// 中间路由器数量
    pub num_routers: usize,
}

impl Default for TopologyOpts {
    fn default() -> Self {
        Self {
            algorithm: CongestionAlgorithm::Tahoe,
            buffer_bytes: DEFAULT_BUFFER_BYTES,
            rcv_window: 65_536,
            num_clients: 1,
            num_routers: 1,
        }
    }
}

/// 构建好的拓扑。
#[derive(Debug)]
pub enum Topology {
    Direct(DirectTopology),
    Cloud(CloudTopology),
}

impl Topology {
    pub fn build(kind: TopologyKind, opts: &TopologyOpts) -> Topology {
        match kind {
            TopologyKind::Direct => Topology::Direct(build_direct(opts)),
            TopologyKind::Cloud => Topology::Cloud(build_cloud(opts)),
        }
    }

    pub fn kind(&self) -> TopologyKind {
        match self {
            Topology::Direct(_) => TopologyKind::Direct,
            Topology::Cloud(_) => TopologyKind::Cloud,
        }
    }

    pub fn algorithm(&self) -> CongestionAlgorithm {
        match self {
            Topology::Direct(t) => t.algorithm,
            Topology::Cloud(t) => t.algorithm,
        }
    }

    pub fn net(&self) -> &Network {
        match self {
            Topology::Direct(t) => &t.net,
            Topology::Cloud(t) => &t.net,
        }
    }

    pub fn net_mut(&mut self) -> &mut Network {
        match self {
            Topology::Direct(t) => &mut t.net,
            Topology::Cloud(t) => &mut t.net,
        }
    }

    /// 发送数据的端点，按确定的遍历顺序。
    pub fn sender_endpoints(&self) -> Vec<EndpointId> {
        match self {
            Topology::Direct(t) => vec![t.sender],
            Topology::Cloud(t) => t.clients.clone(),
        }
    }

    pub fn num_senders(&self) -> usize {
        match self {
            Topology::Direct(_) => 1,
            Topology::Cloud(t) => t.clients.len(),
        }
    }

    pub fn num_routers(&self) -> usize {
        match self {
            Topology::Direct(t) => t.routers.len(),
            Topology::Cloud(t) => t.routers.len(),
        }
    }

    /// 所有发送端计数器的合计。
    pub fn total_stats(&self) -> SenderStats {
        let mut total = SenderStats::default();
        for id in self.sender_endpoints() {
            let s = self.net().endpoint(id).sender().stats();
            total.bytes_transmitted += s.bytes_transmitted;
            total.bytes_retransmitted += s.bytes_retransmitted;
            total.timeouts += s.timeouts;
        }
        total
    }
}
