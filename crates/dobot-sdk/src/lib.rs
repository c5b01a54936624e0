//! Dobot SDK - Dobot 机械臂串口协议 Rust SDK
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 帧编码、校验和、响应校验，无 IO
//! - **传输层** (`serial`): 串口打开/关闭、原始字节收发
//! - **驱动层** (`driver`): 指令目录与串行化执行器
//! - **客户端层** (`client`): 连接生命周期与不抛错的领域 API
//!
//! # 快速开始
//!
//! ```no_run
//! use dobot_sdk::prelude::*;
//!
//! dobot_sdk::init_logger();
//!
//! let service = DobotService::open(DobotConfig::new("/dev/ttyUSB0"));
//! if service.start() {
//!     service.set_movement_config(100.0, 100.0, 80.0, 80.0);
//!     service.move_to_position(PtpMode::MovlXyz, 200.0, 0.0, 50.0, 0.0);
//!     service.set_vacuum_state(true);
//!     service.execute_queue();
//! }
//! ```
//!
//! 需要具体错误类型的用户可以使用驱动层：
//!
//! ```no_run
//! use dobot_sdk::driver::CommandExecutor;
//! use dobot_sdk::serial::SerialTransport;
//! use std::time::Duration;
//!
//! let executor = CommandExecutor::new(SerialTransport::new());
//! executor.connect("/dev/ttyUSB0", Duration::from_millis(3000))?;
//! println!("device: {}", executor.get_device_name()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use dobot_client as client;
pub use dobot_driver as driver;
pub use dobot_protocol as protocol;
pub use dobot_serial as serial;

mod logging;
pub mod prelude;

pub use logging::{LoggerError, init_logger, try_init_logger, try_init_logger_with};

// 客户端层（推荐入口）
pub use dobot_client::{ConfigError, DeviceStatus, DobotConfig, DobotService};

// 驱动层
pub use dobot_driver::{
    CommandExecutor, CommandResponse, CommunicationError, DobotCommand, ExecutorConfig,
    LiftHeight, MetricsSnapshot, MovementProfile, Position,
};

// 协议层与传输层
pub use dobot_protocol::{CommandId, ProtocolError, PtpMode};
pub use dobot_serial::{ReadStrategy, SerialTransport, Transport, TransportError, available_ports};
