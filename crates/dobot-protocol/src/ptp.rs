//! 点到点（PTP）运动模式

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::str::FromStr;

/// PTP 运动模式
///
/// `Jump` 为门型轨迹（抬起 → 平移 → 落下），`Movj` 为关节插补，`Movl` 为直线插补。
/// `Xyz` 后缀表示目标为笛卡尔坐标，`Angle` 表示关节角，`Inc` 表示相对增量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = ProtocolError, constructor = invalid_ptp_mode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PtpMode {
    JumpXyz = 0x00,
    MovjXyz = 0x01,
    MovlXyz = 0x02,
    JumpAngle = 0x03,
    MovjAngle = 0x04,
    MovlAngle = 0x05,
    MovjInc = 0x06,
    MovlInc = 0x07,
    MovjXyzInc = 0x08,
    JumpMovlXyz = 0x09,
}

impl PtpMode {
    pub const ALL: [PtpMode; 10] = [
        PtpMode::JumpXyz,
        PtpMode::MovjXyz,
        PtpMode::MovlXyz,
        PtpMode::JumpAngle,
        PtpMode::MovjAngle,
        PtpMode::MovlAngle,
        PtpMode::MovjInc,
        PtpMode::MovlInc,
        PtpMode::MovjXyzInc,
        PtpMode::JumpMovlXyz,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 命令行 / 配置中使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            PtpMode::JumpXyz => "jump-xyz",
            PtpMode::MovjXyz => "movj-xyz",
            PtpMode::MovlXyz => "movl-xyz",
            PtpMode::JumpAngle => "jump-angle",
            PtpMode::MovjAngle => "movj-angle",
            PtpMode::MovlAngle => "movl-angle",
            PtpMode::MovjInc => "movj-inc",
            PtpMode::MovlInc => "movl-inc",
            PtpMode::MovjXyzInc => "movj-xyz-inc",
            PtpMode::JumpMovlXyz => "jump-movl-xyz",
        }
    }
}

impl Default for PtpMode {
    fn default() -> Self {
        PtpMode::MovlXyz
    }
}

fn invalid_ptp_mode(value: u8) -> ProtocolError {
    ProtocolError::InvalidValue {
        field: "PtpMode".to_string(),
        value,
    }
}

impl FromStr for PtpMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        PtpMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = PtpMode::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown PTP mode '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for PtpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
