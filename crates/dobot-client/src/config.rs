//! 连接配置
//!
//! TOML 格式，所有字段都有默认值（`port_name` 除外，必须显式给出）：
//!
//! ```toml
//! port_name = "/dev/ttyUSB0"
//! timeout_ms = 3000
//! baud_rate = 115200
//! response_timeout_ms = 200
//! poll_interval_ms = 5
//! read_strategy = "poll"
//! queue_commands = true
//! ```

use dobot_driver::ExecutorConfig;
use dobot_serial::{DEFAULT_BAUD_RATE, ReadStrategy, SerialSettings};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 连接超时允许范围（毫秒）
pub const TIMEOUT_RANGE_MS: RangeInclusive<u64> = 1000..=10000;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("port_name must not be blank")]
    BlankPort,

    #[error("timeout_ms {value} out of range ({min}..={max})")]
    TimeoutOutOfRange { value: u64, min: u64, max: u64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Dobot 连接配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DobotConfig {
    /// 串口名（如 `/dev/ttyUSB0`、`COM3`）
    pub port_name: String,
    /// 打开串口时的超时
    pub timeout_ms: u64,
    pub baud_rate: u32,
    /// 每条指令的应答窗口
    pub response_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub read_strategy: ReadStrategy,
    /// 运动/配置类指令是否进入设备指令队列
    pub queue_commands: bool,
}

impl Default for DobotConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            timeout_ms: 3000,
            baud_rate: DEFAULT_BAUD_RATE,
            response_timeout_ms: 200,
            poll_interval_ms: 5,
            read_strategy: ReadStrategy::Poll,
            queue_commands: true,
        }
    }
}

impl DobotConfig {
    /// 使用默认参数连接指定串口
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_response_timeout_ms(mut self, response_timeout_ms: u64) -> Self {
        self.response_timeout_ms = response_timeout_ms;
        self
    }

    pub fn with_read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.read_strategy = strategy;
        self
    }

    pub fn with_queue_commands(mut self, queue_commands: bool) -> Self {
        self.queue_commands = queue_commands;
        self
    }

    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port_name.trim().is_empty() {
            return Err(ConfigError::BlankPort);
        }
        if !TIMEOUT_RANGE_MS.contains(&self.timeout_ms) {
            return Err(ConfigError::TimeoutOutOfRange {
                value: self.timeout_ms,
                min: *TIMEOUT_RANGE_MS.start(),
                max: *TIMEOUT_RANGE_MS.end(),
            });
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "baud_rate",
                reason: "must be positive".to_string(),
            });
        }
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "response_timeout_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.poll_interval_ms > self.response_timeout_ms {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: format!(
                    "{} exceeds response_timeout_ms {}",
                    self.poll_interval_ms, self.response_timeout_ms
                ),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            response_timeout: self.response_timeout(),
        }
    }

    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            baud_rate: self.baud_rate,
            read_strategy: self.read_strategy,
            poll_interval: self.poll_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DobotConfig::new("COM3");
        assert_eq!(config.timeout_ms, 3000);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.response_timeout(), Duration::from_millis(200));
        assert_eq!(config.read_strategy, ReadStrategy::Poll);
        assert!(config.queue_commands);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal() {
        let config = DobotConfig::from_toml_str(r#"port_name = "/dev/ttyUSB0""#).unwrap();
        assert_eq!(config, DobotConfig::new("/dev/ttyUSB0"));
    }

    #[test]
    fn test_parse_full() {
        let text = r#"
            port_name = "COM4"
            timeout_ms = 5000
            baud_rate = 9600
            response_timeout_ms = 300
            poll_interval_ms = 2
            read_strategy = "full_window"
            queue_commands = false
        "#;
        let config = DobotConfig::from_toml_str(text).unwrap();
        assert_eq!(config.port_name, "COM4");
        assert_eq!(config.timeout(), Duration::from_millis(5000));
        assert_eq!(config.read_strategy, ReadStrategy::FullWindow);
        assert!(!config.queue_commands);
        assert_eq!(config.serial_settings().baud_rate, 9600);
        assert_eq!(
            config.executor_config().response_timeout,
            Duration::from_millis(300)
        );
    }

    #[test]
    fn test_blank_port_rejected() {
        assert!(matches!(
            DobotConfig::from_toml_str(r#"port_name = "   ""#),
            Err(ConfigError::BlankPort)
        ));
        assert!(matches!(
            DobotConfig::from_toml_str(""),
            Err(ConfigError::BlankPort)
        ));
    }

    #[test]
    fn test_timeout_range() {
        for (value, ok) in [(999, false), (1000, true), (10000, true), (10001, false)] {
            let result = DobotConfig::new("COM3").with_timeout_ms(value).validate();
            assert_eq!(result.is_ok(), ok, "timeout_ms = {}", value);
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            DobotConfig::from_toml_str("port_name = \"COM3\"\nspeed = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_response_timeout_rejected() {
        assert!(matches!(
            DobotConfig::new("COM3").with_response_timeout_ms(0).validate(),
            Err(ConfigError::InvalidValue {
                field: "response_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_poll_interval_bounds() {
        let mut config = DobotConfig::new("COM3");
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        config.poll_interval_ms = 500;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DobotConfig::new("COM7")
            .with_read_strategy(ReadStrategy::FullWindow)
            .with_queue_commands(false);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("read_strategy = \"full_window\""));
        assert_eq!(DobotConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port_name = \"/dev/ttyACM0\"").unwrap();
        writeln!(file, "timeout_ms = 2000").unwrap();

        let config = DobotConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port_name, "/dev/ttyACM0");
        assert_eq!(config.timeout_ms, 2000);

        assert!(matches!(
            DobotConfig::from_file("/nonexistent/dobot.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
