//! # Dobot Client
//!
//! 面向上层业务的门面：
//!
//! - [`DobotService`]: 连接生命周期 + 不抛错的领域 API（`bool` / `Option`）
//! - [`DobotConfig`]: TOML 连接配置
//! - [`DeviceStatus`]: 状态快照
//!
//! 需要区分错误类型的调用方可以通过 [`DobotService::executor`] 下沉到执行器。

pub mod config;
pub mod service;
pub mod status;

pub use config::{ConfigError, DobotConfig, TIMEOUT_RANGE_MS};
pub use service::DobotService;
pub use status::DeviceStatus;
