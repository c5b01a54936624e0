//! 配置加载
//!
//! 优先级：命令行参数 > `--config` 指定文件 > `<config_dir>/dobot/config.toml` > 默认值

use crate::GlobalArgs;
use anyhow::{Context, Result};
use dobot_sdk::DobotConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub fn default_config_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("dobot");
    path.push("config.toml");
    Some(path)
}

fn load_file(path: &Path) -> Result<DobotConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
}

/// 解析最终生效的配置
pub fn resolve(global: &GlobalArgs) -> Result<DobotConfig> {
    let mut config = match &global.config {
        Some(path) => load_file(path)?,
        None => match default_config_file() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                load_file(&path)?
            },
            _ => DobotConfig::default(),
        },
    };

    if let Some(port) = &global.port {
        config.port_name = port.clone();
    }

    if global.no_queue {
        config.queue_commands = false;
    }

    config.validate().context("配置无效（可用 --port 指定串口）")?;

    Ok(config)
}
