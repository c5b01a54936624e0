//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use dobot_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use crate::client::{DobotConfig, DobotService};

// 参数类型
pub use crate::driver::{LiftHeight, MovementProfile, Position};
pub use crate::protocol::PtpMode;

// 传输层 Trait
pub use crate::serial::{ReadStrategy, Transport};

// 错误类型
pub use crate::client::ConfigError;
pub use crate::driver::CommunicationError;
pub use crate::protocol::ProtocolError;
pub use crate::serial::TransportError;
