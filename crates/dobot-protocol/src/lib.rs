//! # Dobot Protocol
//!
//! Dobot 机械臂串口二进制协议定义（无硬件依赖，无 IO，无状态）
//!
//! ## 模块
//!
//! - `ids`: 指令 ID 常量定义
//! - `control`: 控制字节位域
//! - `frame`: 帧编码、校验和、响应校验
//! - `payload`: 参数负载读写工具
//! - `ptp`: 点到点运动模式
//! - `hexdump`: 原始字节的十六进制转储（诊断日志）
//!
//! ## 帧格式
//!
//! ```text
//! +-----------+--------+------------+---------+-------------------+----------+
//! | 0xAA 0xAA | length | command_id | control | payload           | checksum |
//! |  2 bytes  | 1 byte |   1 byte   | 1 byte  | (length - 2) bytes|  1 byte  |
//! +-----------+--------+------------+---------+-------------------+----------+
//! ```
//!
//! ## 字节序
//!
//! 负载中的浮点数使用小端字节序（IEEE-754 `f32`）。
//! 本模块提供了字节序转换工具函数。

pub mod control;
pub mod frame;
pub mod hexdump;
pub mod ids;
pub mod payload;
pub mod ptp;

// 重新导出常用类型
pub use control::ControlFlags;
pub use frame::*;
pub use hexdump::{hex_dump, hex_line};
pub use ids::CommandId;
pub use payload::{PayloadReader, PayloadWriter, decode_ascii};
pub use ptp::PtpMode;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Truncated frame: got {actual} bytes, need at least {minimum}")]
    Truncated { actual: usize, minimum: usize },

    #[error("Invalid frame header: {found:02X?}")]
    InvalidHeader { found: [u8; 2] },

    #[error("Invalid length field: {declared} (must be at least 2)")]
    InvalidLength { declared: u8 },

    #[error("Length mismatch: header declares {declared} bytes, frame carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Command id mismatch: expected {expected}, got {actual}")]
    CommandIdMismatch { expected: u8, actual: u8 },

    #[error("Payload too long: {len} bytes (max {max})")]
    PayloadTooLong { len: usize, max: usize },

    #[error("Payload too short: need {needed} more bytes, {remaining} remaining")]
    PayloadTooShort { needed: usize, remaining: usize },

    #[error("Unexpected trailing payload bytes: {count}")]
    TrailingBytes { count: usize },

    #[error("Non-ASCII byte 0x{byte:02X} at offset {index}")]
    NonAscii { index: usize, byte: u8 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },
}

/// 字节序转换工具函数
///
/// 负载使用小端字节序，这些函数用于在协议层进行字节序转换。
///
/// 小端字节序转 f32
pub fn bytes_to_f32_le(bytes: [u8; 4]) -> f32 {
    f32::from_le_bytes(bytes)
}

/// f32 转小端字节序
pub fn f32_to_bytes_le(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_f32_le() {
        // 100.0f32 = 0x42C80000
        let bytes = [0x00, 0x00, 0xC8, 0x42];
        assert_eq!(bytes_to_f32_le(bytes), 100.0);
    }

    #[test]
    fn test_bytes_to_f32_le_negative() {
        // -1.0f32 = 0xBF800000
        let bytes = [0x00, 0x00, 0x80, 0xBF];
        assert_eq!(bytes_to_f32_le(bytes), -1.0);
    }

    #[test]
    fn test_f32_to_bytes_le() {
        assert_eq!(f32_to_bytes_le(150.0), [0x00, 0x00, 0x16, 0x43]);
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::ChecksumMismatch {
            expected: 0x10,
            actual: 0x20,
        };
        assert_eq!(
            err.to_string(),
            "Checksum mismatch: expected 0x10, got 0x20"
        );

        let err = ProtocolError::InvalidHeader { found: [0xAA, 0x55] };
        assert!(err.to_string().contains("AA"));
        assert!(err.to_string().contains("55"));
    }
}
