//! 控制字节定义
//!
//! 协议定义：
//! - Bit 0: 置1表示队列指令（设备将其追加到板载指令队列，而非立即执行）
//! - Bit 1-7: 保留，必须为 0

use bilge::prelude::*;

/// 控制字节位域（8 位）
///
/// bilge 默认使用 LSB first 位序，与协议要求一致。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub queued: bool,  // Bit 0: 队列指令
    pub reserved: u7, // Bit 1-7: 保留
}

impl ControlFlags {
    /// 队列标志位掩码
    pub const QUEUED_MASK: u8 = 0x01;

    /// 立即执行（所有位为 0）
    pub fn immediate() -> Self {
        Self::from(u8::new(0))
    }

    /// 按队列标志创建
    pub fn with_queued(queued: bool) -> Self {
        let mut flags = Self::immediate();
        flags.set_queued(queued);
        flags
    }

    /// 从原始字节解析（保留位原样保留，由调用方决定是否拒绝）
    pub fn from_byte(value: u8) -> Self {
        Self::from(u8::new(value))
    }

    /// 转换为原始字节
    pub fn to_byte(self) -> u8 {
        u8::from(self).value()
    }

    /// 保留位是否全部为 0
    pub fn reserved_clear(self) -> bool {
        self.to_byte() & !Self::QUEUED_MASK == 0
    }
}
