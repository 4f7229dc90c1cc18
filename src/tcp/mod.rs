//! TCP 模块
//!
//! 发送端拥塞控制核心、接收端累计确认逻辑与 RTO 估计。

mod algorithm;
mod receiver;
pub mod rto;
mod sender;

pub use algorithm::{CongestionAlgorithm, CongestionMode, UnknownAlgorithm};
pub use receiver::Receiver;
pub use rto::RtoEstimator;
pub use sender::{Sender, SenderStats};
