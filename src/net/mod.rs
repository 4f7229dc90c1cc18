//! 网络模块
//!
//! 网络仿真的元素：端点、路由器、链路、数据包与把它们装在一起的 arena。

mod endpoint;
mod id;
mod link;
mod network;
mod packet;
mod router;

pub use endpoint::{Endpoint, EndpointPhase};
pub use id::{EndpointId, LinkId, NetRef, RouterId};
pub use link::{Link, LinkPhase};
pub use network::Network;
pub use packet::{Packet, PacketKind, HEADER_BYTES, MSS};
pub use router::{Router, DEFAULT_BUFFER_BYTES};
