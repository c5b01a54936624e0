//! 设备状态快照

use dobot_driver::MetricsSnapshot;
use serde::Serialize;
use std::fmt;

/// 门面当前状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub port_name: String,
    pub connected: bool,
    /// 设备已回应探活
    pub initialized: bool,
    pub queue_commands: bool,
    pub metrics: MetricsSnapshot,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Port:        {}", self.port_name)?;
        writeln!(f, "Connected:   {}", self.connected)?;
        writeln!(f, "Initialized: {}", self.initialized)?;
        writeln!(f, "Queued mode: {}", self.queue_commands)?;
        write!(
            f,
            "Commands:    {} total, {} ok, {} failed",
            self.metrics.commands_total,
            self.metrics.commands_ok,
            self.metrics.failures()
        )
    }
}
