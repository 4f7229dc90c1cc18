//! 标识符类型
//!
//! 拓扑内所有实体都放在 arena 里，组件之间只保存稳定下标。

/// 端点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(pub usize);

/// 路由器标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouterId(pub usize);

/// 链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub usize);

/// 网络元素引用：链路两端、以及转发时的落点都用它表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetRef {
    Endpoint(EndpointId),
    Router(RouterId),
}
