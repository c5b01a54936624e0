//! # Dobot Driver
//!
//! 指令目录与串行化的请求/应答执行器。
//!
//! - `command`: 每个机器人操作一个枚举变体，负责编码参数与解析应答
//! - `executor`: 驱动单条指令完成“发送 → 等待 → 校验 → 解析”，同一时刻只允许一条指令在途
//! - `error`: 统一的通信错误分类
//! - `metrics`: 执行器原子计数器

pub mod command;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod types;

pub use command::{CommandResponse, Direction, DobotCommand};
pub use error::CommunicationError;
pub use executor::{CommandExecutor, DEFAULT_RESPONSE_TIMEOUT, ExecutorConfig};
pub use metrics::{ExecutorMetrics, MetricsSnapshot};
pub use types::{LiftHeight, MovementProfile, Position};

// 重新导出下层类型，方便上层只依赖本 crate
pub use dobot_protocol::{CommandId, ProtocolError, PtpMode};
pub use dobot_serial::{ReadStrategy, Transport, TransportError};
