//! 日志初始化
//!
//! 安装 `tracing-subscriber`（fmt + EnvFilter），并把 `log` 记录桥接到 tracing。
//! `RUST_LOG` 优先于默认过滤规则。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("log bridge already installed: {0}")]
    LogBridge(#[from] log::SetLoggerError),
    #[error("invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 初始化日志（重复调用是空操作）
pub fn init_logger() {
    let _ = try_init_logger();
}

/// 使用默认过滤规则 `info` 初始化
pub fn try_init_logger() -> Result<(), LoggerError> {
    try_init_logger_with(DEFAULT_DIRECTIVE)
}

/// 使用指定的默认过滤规则初始化（`RUST_LOG` 存在时以其为准）
pub fn try_init_logger_with(default_directive: &str) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)?,
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}
