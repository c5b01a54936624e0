//! 指令 ID 定义
//!
//! 取值与 Dobot 固件公开的通信协议保持一致。
//! 同一 ID 可能同时承担查询与设置（如设备名称），由负载是否为空区分。

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 指令 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CommandId {
    /// 设备序列号（只读）
    DeviceSerialNumber = 0,
    /// 设备名称（查询 / 设置）
    DeviceName = 1,
    /// 回零参数（默认 Home 位置）
    HomeParams = 30,
    /// 回零指令
    HomeCommand = 31,
    /// 末端吸盘
    SuctionCup = 62,
    /// PTP 坐标轴速度/加速度参数
    PtpCoordinateParams = 81,
    /// PTP 门型运动（Jump）参数
    PtpJumpParams = 82,
    /// PTP 运动指令
    PtpCommand = 84,
    /// 开始执行指令队列
    QueuedCmdStartExec = 240,
    /// 停止执行指令队列
    QueuedCmdStopExec = 241,
    /// 清空指令队列
    QueuedCmdClear = 245,
}

impl CommandId {
    /// 原始字节值
    #[inline]
    pub fn as_u8(self) -> u8 {
        self.into()
    }

    /// 从原始字节解析，未知 ID 返回 `None`
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// 用于日志的名称
    pub fn name(self) -> &'static str {
        match self {
            CommandId::DeviceSerialNumber => "DeviceSerialNumber",
            CommandId::DeviceName => "DeviceName",
            CommandId::HomeParams => "HomeParams",
            CommandId::HomeCommand => "HomeCommand",
            CommandId::SuctionCup => "SuctionCup",
            CommandId::PtpCoordinateParams => "PtpCoordinateParams",
            CommandId::PtpJumpParams => "PtpJumpParams",
            CommandId::PtpCommand => "PtpCommand",
            CommandId::QueuedCmdStartExec => "QueuedCmdStartExec",
            CommandId::QueuedCmdStopExec => "QueuedCmdStopExec",
            CommandId::QueuedCmdClear => "QueuedCmdClear",
        }
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u8())
    }
}
