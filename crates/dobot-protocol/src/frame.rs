//! 帧编码与响应校验
//!
//! 本模块只做纯函数计算：构建请求帧、计算校验和、校验响应帧。
//! 不做任何 IO，也不持有状态。

use crate::ProtocolError;
use crate::control::ControlFlags;

/// 帧头（固定标记）
pub const HEADER: [u8; 2] = [0xAA, 0xAA];

/// 帧头长度
pub const HEADER_LEN: usize = 2;

/// 最短帧：Header(2) + Len(1) + ID(1) + Ctrl(1) + Checksum(1)
pub const MIN_FRAME_LEN: usize = 6;

/// 帧中除 ID/Ctrl/Payload 以外的字节数：Header(2) + Len(1) + Checksum(1)
pub const FRAME_OVERHEAD: usize = 4;

/// 负载最大长度（length 字段为 u8，且包含 ID 与 Ctrl 两个字节）
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize - 2;

/// 字段偏移
pub const LENGTH_INDEX: usize = 2;
pub const COMMAND_INDEX: usize = 3;
pub const CONTROL_INDEX: usize = 4;
pub const PAYLOAD_INDEX: usize = 5;

/// 计算校验和
///
/// 返回使 `command_id + control + sum(payload) + checksum ≡ 0 (mod 256)` 成立的字节。
pub fn compute_checksum(command_id: u8, control: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(command_id.wrapping_add(control), |acc, &b| acc.wrapping_add(b))
        .wrapping_neg()
}

/// 构建请求帧
///
/// # 错误
/// - `ProtocolError::PayloadTooLong`: 负载超过 253 字节
pub fn encode_request(command_id: u8, control: u8, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooLong {
            len: payload.len(),
            max: MAX_PAYLOAD_LEN,
        });
    }

    let mut out = Vec::with_capacity(payload.len() + MIN_FRAME_LEN);
    out.extend_from_slice(&HEADER);
    out.push((payload.len() + 2) as u8);
    out.push(command_id);
    out.push(control);
    out.extend_from_slice(payload);
    out.push(compute_checksum(command_id, control, payload));
    Ok(out)
}

/// 校验响应帧并返回负载切片
///
/// 校验顺序：最短长度 → 帧头 → length 字段与实际字节数 → 校验和 → 指令 ID。
/// 截断的缓冲区直接报错，不做部分解析。
pub fn validate_response(bytes: &[u8], expected_command_id: u8) -> Result<&[u8], ProtocolError> {
    let (command_id, _control, payload) = split_frame(bytes)?;

    if command_id != expected_command_id {
        return Err(ProtocolError::CommandIdMismatch {
            expected: expected_command_id,
            actual: command_id,
        });
    }

    Ok(payload)
}

/// 结构校验（不检查指令 ID），返回 (command_id, control, payload)
fn split_frame(bytes: &[u8]) -> Result<(u8, u8, &[u8]), ProtocolError> {
    if bytes.len() < MIN_FRAME_LEN {
        return Err(ProtocolError::Truncated {
            actual: bytes.len(),
            minimum: MIN_FRAME_LEN,
        });
    }

    if bytes[..HEADER_LEN] != HEADER {
        return Err(ProtocolError::InvalidHeader {
            found: [bytes[0], bytes[1]],
        });
    }

    let declared = bytes[LENGTH_INDEX];
    if declared < 2 {
        return Err(ProtocolError::InvalidLength { declared });
    }

    let actual = bytes.len() - FRAME_OVERHEAD;
    if declared as usize != actual {
        return Err(ProtocolError::LengthMismatch {
            declared: declared as usize,
            actual,
        });
    }

    let checksum_index = bytes.len() - 1;
    let command_id = bytes[COMMAND_INDEX];
    let control = bytes[CONTROL_INDEX];
    let payload = &bytes[PAYLOAD_INDEX..checksum_index];

    let expected = compute_checksum(command_id, control, payload);
    if bytes[checksum_index] != expected {
        return Err(ProtocolError::ChecksumMismatch {
            expected,
            actual: bytes[checksum_index],
        });
    }

    Ok((command_id, control, payload))
}

/// 流式扫描结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameScan {
    /// 还需要更多字节
    Incomplete,
    /// 缓冲区开头已有一个完整帧（值为帧总长度，未做校验和检查）
    Complete(usize),
    /// 开头字节不可能构成合法帧（帧头或 length 字段错误），继续等待没有意义
    Invalid,
}

/// 判断缓冲区开头是否已收到完整帧
///
/// 供传输层在读取窗口内提前返回使用；内容校验仍由 [`validate_response`] 负责。
pub fn scan_frame(buf: &[u8]) -> FrameScan {
    for (i, &b) in buf.iter().take(HEADER_LEN).enumerate() {
        if b != HEADER[i] {
            return FrameScan::Invalid;
        }
    }

    let Some(&declared) = buf.get(LENGTH_INDEX) else {
        return FrameScan::Incomplete;
    };
    if declared < 2 {
        return FrameScan::Invalid;
    }

    let total = declared as usize + FRAME_OVERHEAD;
    if buf.len() >= total {
        FrameScan::Complete(total)
    } else {
        FrameScan::Incomplete
    }
}

/// 一帧的结构化表示
///
/// 主要用于测试对端和 Mock 传输层构造应答帧。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command_id: u8,
    pub control: ControlFlags,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command_id: u8, control: ControlFlags, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            command_id,
            control,
            payload: payload.into(),
        }
    }

    /// 编码为线上字节
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_request(self.command_id, self.control.to_byte(), &self.payload)
    }

    /// 从线上字节解析（完整结构校验，不限定指令 ID）
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (command_id, control, payload) = split_frame(bytes)?;
        Ok(Self {
            command_id,
            control: ControlFlags::from_byte(control),
            payload: payload.to_vec(),
        })
    }

    /// length 字段的值
    pub fn length_field(&self) -> usize {
        self.payload.len() + 2
    }
}
