//! Cloud 拓扑构建
//!
//! N 个客户端各自经一条 client 链路汇入 R0；路由器 R0..R(n-1) 串联；
//! 每个服务端经一条 server 链路接在 R(n-1) 上。客户端与服务端按下标配对。

use super::TopologyOpts;
use crate::net::{EndpointId, LinkId, NetRef, Network, RouterId};
use crate::tcp::CongestionAlgorithm;

/// 汇聚拓扑：多对 client/server 共享一串路由器。
#[derive(Debug)]
pub struct CloudTopology {
    pub net: Network,
    pub algorithm: CongestionAlgorithm,
    pub clients: Vec<EndpointId>,
    pub servers: Vec<EndpointId>,
    pub client_links: Vec<LinkId>,
    pub server_links: Vec<LinkId>,
    /// chain_links[i] 连接 R(i) 与 R(i+1)
    pub chain_links: Vec<LinkId>,
    pub routers: Vec<RouterId>,
}

/// 构建 Cloud 拓扑。
pub fn build_cloud(opts: &TopologyOpts) -> CloudTopology {
    assert!(
        opts.num_clients >= 1,
        "cloud topology requires at least one client"
    );
    assert!(
        opts.num_routers >= 1,
        "cloud topology requires at least one router"
    );

    let mut net = Network::default();

    let mut clients = Vec::with_capacity(opts.num_clients);
    let mut servers = Vec::with_capacity(opts.num_clients);
    for i in 0..opts.num_clients {
        let client = net.add_endpoint(format!("client{i}"), opts.algorithm, opts.rcv_window);
        let server = net.add_endpoint(format!("server{i}"), opts.algorithm, opts.rcv_window);
        net.pair(client, server);
        clients.push(client);
        servers.push(server);
    }

    let routers: Vec<RouterId> = (0..opts.num_routers)
        .map(|i| net.add_router(format!("router{i}"), opts.buffer_bytes))
        .collect();
    let n = routers.len();

    // 客户端一侧的链路接 R0。
    let client_links: Vec<LinkId> = clients
        .iter()
        .enumerate()
        .map(|(j, &client)| {
            let link = net.add_link(
                format!("clientLink{j}"),
                NetRef::Endpoint(client),
                NetRef::Router(routers[0]),
                0.001,
                0.001,
            );
            net.add_route(routers[0], client, link);
            link
        })
        .collect();

    // 路由器串联。
    let mut chain_links = Vec::with_capacity(n.saturating_sub(1));
    for i in 1..n {
        let link = net.add_link(
            format!("link{i}"),
            NetRef::Router(routers[i - 1]),
            NetRef::Router(routers[i]),
            0.001,
            0.001,
        );
        // 数据段沿链前进，ACK 沿链后退。
        for j in 0..opts.num_clients {
            net.add_route(routers[i - 1], servers[j], link);
            net.add_route(routers[i], clients[j], link);
        }
        chain_links.push(link);
    }

    // 服务端一侧的链路接 R(n-1)，传输时延取 10 倍。
    let server_links: Vec<LinkId> = servers
        .iter()
        .enumerate()
        .map(|(j, &server)| {
            let link = net.add_link(
                format!("serverLink{j}"),
                NetRef::Endpoint(server),
                NetRef::Router(routers[n - 1]),
                0.01,
                0.001,
            );
            net.add_route(routers[n - 1], server, link);
            link
        })
        .collect();

    CloudTopology {
        net,
        algorithm: opts.algorithm,
        clients,
        servers,
        client_links,
        server_links,
        chain_links,
        routers,
    }
}
