//! 网络 arena
//!
//! 端点、路由器、链路都放在这里，组件之间只用稳定下标互相引用，
//! 所有跨组件交互都经由这里的分派方法（借用按字段拆分，互不重叠）。

use super::endpoint::{Endpoint, EndpointPhase};
use super::id::{EndpointId, LinkId, NetRef, RouterId};
use super::link::{Link, LinkPhase};
use super::router::Router;
use crate::sim::{SimTime, TimerRegistry};
use crate::tcp::CongestionAlgorithm;

/// 网络拓扑 arena
#[derive(Debug, Default)]
pub struct Network {
    endpoints: Vec<Endpoint>,
    routers: Vec<Router>,
    links: Vec<Link>,
}

impl Network {
    /// 添加端点
    pub fn add_endpoint(
        &mut self,
        name: impl Into<String>,
        algorithm: CongestionAlgorithm,
        rcv_window: u64,
    ) -> EndpointId {
        let id = EndpointId(self.endpoints.len());
        self.endpoints
            .push(Endpoint::new(id, name, algorithm, rcv_window));
        id
    }

    /// 互设对端：a 的数据段发往 b，b 的发往 a。
    pub fn pair(&mut self, a: EndpointId, b: EndpointId) {
        self.endpoints[a.0].set_remote(b);
        self.endpoints[b.0].set_remote(a);
    }

    /// 添加路由器
    pub fn add_router(&mut self, name: impl Into<String>, buffer_bytes: u64) -> RouterId {
        let id = RouterId(self.routers.len());
        self.routers.push(Router::new(id, name, buffer_bytes));
        id
    }

    /// 连接两个元素（创建双向链路）。端点侧同时记下所属链路。
    pub fn add_link(
        &mut self,
        name: impl Into<String>,
        a: NetRef,
        b: NetRef,
        tx_delay: f64,
        prop_delay: f64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        self.links.push(Link::new(id, name, a, b, tx_delay, prop_delay));
        for end in [a, b] {
            if let NetRef::Endpoint(e) = end {
                self.endpoints[e.0].set_link(id);
            }
        }
        id
    }

    /// 配置路由器转发表项。
    pub fn add_route(&mut self, router: RouterId, dst: EndpointId, via: LinkId) {
        self.routers[router.0].add_route(dst, via);
    }

    /// 启动一个端点的数据流。
    pub fn start_flow(
        &mut self,
        id: EndpointId,
        total_bytes: u64,
        timers: &mut TimerRegistry,
        now: SimTime,
    ) {
        let Self {
            endpoints, links, ..
        } = self;
        let ep = &mut endpoints[id.0];
        let link = ep.link();
        ep.start_flow(total_bytes, &mut links[link.0], timers, now);
    }

    pub fn process_endpoint(
        &mut self,
        id: EndpointId,
        phase: EndpointPhase,
        timers: &mut TimerRegistry,
        now: SimTime,
    ) {
        let Self {
            endpoints, links, ..
        } = self;
        let ep = &mut endpoints[id.0];
        let link = ep.link();
        ep.process(phase, &mut links[link.0], timers, now);
    }

    pub fn process_router(&mut self, id: RouterId) {
        let Self { routers, links, .. } = self;
        routers[id.0].process(links);
    }

    pub fn process_link(&mut self, id: LinkId, phase: LinkPhase) {
        let Self {
            endpoints,
            routers,
            links,
        } = self;
        links[id.0].process(phase, endpoints, routers);
    }

    /// 调度器在定时器到期后调用：让该端点的发送端执行超时重传。
    pub fn fire_rto(&mut self, id: EndpointId, timers: &mut TimerRegistry, now: SimTime) {
        let Self {
            endpoints, links, ..
        } = self;
        let ep = &mut endpoints[id.0];
        let link = ep.link();
        ep.on_rto(&mut links[link.0], timers, now);
    }

    pub fn endpoint(&self, id: EndpointId) -> &Endpoint {
        &self.endpoints[id.0]
    }

    pub fn endpoint_mut(&mut self, id: EndpointId) -> &mut Endpoint {
        &mut self.endpoints[id.0]
    }

    pub fn router(&self, id: RouterId) -> &Router {
        &self.routers[id.0]
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub fn num_endpoints(&self) -> usize {
        self.endpoints.len()
    }

    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }
}
