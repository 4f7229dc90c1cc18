//! Direct 拓扑构建
//!
//! sender — L0 — R0 — L1 — R1 — … — R(n-1) — Ln — receiver。
//! 靠近接收端的链路传输时延是其余链路的 10 倍，其它都可忽略。

use super::TopologyOpts;
use crate::net::{EndpointId, LinkId, NetRef, Network, RouterId};
use crate::tcp::CongestionAlgorithm;

/// 链式拓扑：一对端点夹着一串路由器。
#[derive(Debug)]
pub struct DirectTopology {
    pub net: Network,
    pub algorithm: CongestionAlgorithm,
    pub sender: EndpointId,
    pub receiver: EndpointId,
    pub routers: Vec<RouterId>,
    /// links[i] 是 R(i-1) 与 R(i) 之间的链路；首尾分别接端点。
    pub links: Vec<LinkId>,
}

/// 构建 Direct 拓扑。
pub fn build_direct(opts: &TopologyOpts) -> DirectTopology {
    assert!(
        opts.num_routers >= 1,
        "direct topology requires at least one router"
    );

    let mut net = Network::default();
    let sender = net.add_endpoint("sender", opts.algorithm, opts.rcv_window);
    let receiver = net.add_endpoint("receiver", opts.algorithm, opts.rcv_window);
    net.pair(sender, receiver);

    let routers: Vec<RouterId> = (0..opts.num_routers)
        .map(|i| net.add_router(format!("router{i}"), opts.buffer_bytes))
        .collect();

    // 链路 0：sender <-> R0；链路 i：R(i-1) <-> R(i)；链路 n：R(n-1) <-> receiver。
    // 接收端一侧的传输时延取 10 倍（t_x = 0.01），其余 0.001；传播时延一律 0.001。
    let n = routers.len();
    let mut links = Vec::with_capacity(n + 1);
    links.push(net.add_link(
        "link0",
        NetRef::Endpoint(sender),
        NetRef::Router(routers[0]),
        0.001,
        0.001,
    ));
    for i in 1..n {
        links.push(net.add_link(
            format!("link{i}"),
            NetRef::Router(routers[i - 1]),
            NetRef::Router(routers[i]),
            0.001,
            0.001,
        ));
    }
    links.push(net.add_link(
        format!("link{n}"),
        NetRef::Router(routers[n - 1]),
        NetRef::Endpoint(receiver),
        0.01,
        0.001,
    ));

    // 转发表：数据段朝接收端走，ACK 朝发送端走。
    for (i, &router) in routers.iter().enumerate() {
        net.add_route(router, sender, links[i]);
        net.add_route(router, receiver, links[i + 1]);
    }

    DirectTopology {
        net,
        algorithm: opts.algorithm,
        sender,
        receiver,
        routers,
        links,
    }
}
