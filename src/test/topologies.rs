use crate::tcp::CongestionAlgorithm;
use crate::topo::{build_cloud, build_direct, Topology, TopologyKind, TopologyOpts};

fn opts(num_clients: usize, num_routers: usize) -> TopologyOpts {
    TopologyOpts {
        algorithm: CongestionAlgorithm::Reno,
        num_clients,
        num_routers,
        ..TopologyOpts::default()
    }
}

#[test]
fn direct_topology_wires_a_chain_of_routers() {
    let t = build_direct(&opts(1, 3));

    assert_eq!(t.routers.len(), 3);
    // One link per router plus the receiver-side link.
    assert_eq!(t.links.len(), 4);
    assert_eq!(t.net.num_endpoints(), 2);
    assert_ne!(t.sender, t.receiver);

    assert_eq!(t.net.link(t.links[0]).name(), "link0");
    assert_eq!(t.net.link(t.links[3]).name(), "link3");
    assert_eq!(t.net.endpoint(t.sender).name(), "sender");
    assert_eq!(t.net.endpoint(t.receiver).name(), "receiver");
}

#[test]
fn cloud_topology_pairs_clients_and_servers_by_index() {
    let t = build_cloud(&opts(3, 2));

    assert_eq!(t.clients.len(), 3);
    assert_eq!(t.servers.len(), 3);
    assert_eq!(t.client_links.len(), 3);
    assert_eq!(t.server_links.len(), 3);
    assert_eq!(t.chain_links.len(), 1);
    assert_eq!(t.routers.len(), 2);
    assert_eq!(t.net.num_endpoints(), 6);

    assert_eq!(t.net.endpoint(t.clients[2]).name(), "client2");
    assert_eq!(t.net.endpoint(t.servers[2]).name(), "server2");
    assert_eq!(t.net.link(t.client_links[0]).name(), "clientLink0");
    assert_eq!(t.net.link(t.server_links[1]).name(), "serverLink1");
}

#[test]
fn topology_enum_reports_kind_and_senders() {
    let direct = Topology::build(TopologyKind::Direct, &opts(1, 1));
    assert_eq!(direct.kind(), TopologyKind::Direct);
    assert_eq!(direct.num_senders(), 1);
    assert_eq!(direct.num_routers(), 1);

    let cloud = Topology::build(TopologyKind::Cloud, &opts(4, 1));
    assert_eq!(cloud.kind(), TopologyKind::Cloud);
    assert_eq!(cloud.num_senders(), 4);
    assert_eq!(cloud.sender_endpoints().len(), 4);
}

#[test]
fn kind_and_algorithm_parse_case_insensitively() {
    assert_eq!(
        "newreno".parse::<CongestionAlgorithm>().unwrap(),
        CongestionAlgorithm::NewReno
    );
    assert_eq!(
        "TAHOE".parse::<CongestionAlgorithm>().unwrap(),
        CongestionAlgorithm::Tahoe
    );
    assert!("vegas".parse::<CongestionAlgorithm>().is_err());

    assert_eq!("cloud".parse::<TopologyKind>().unwrap(), TopologyKind::Cloud);
    assert_eq!(
        "DIRECT".parse::<TopologyKind>().unwrap(),
        TopologyKind::Direct
    );
    assert!("ring".parse::<TopologyKind>().is_err());
}

#[test]
#[should_panic(expected = "at least one router")]
fn direct_topology_rejects_zero_routers() {
    build_direct(&opts(1, 0));
}
