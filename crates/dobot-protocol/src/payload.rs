//! 负载读写工具
//!
//! 负载规则：
//! - 浮点数：4 字节小端 IEEE-754
//! - 布尔值：1 字节（0 / 1）
//! - 字符串：原始 ASCII 字节，无长度前缀，读取时去掉末尾的 NUL 填充

use crate::{ProtocolError, bytes_to_f32_le, f32_to_bytes_le};

/// 负载构建器
#[derive(Debug, Default, Clone)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn put_bool(&mut self, value: bool) -> &mut Self {
        self.buf.push(value as u8);
        self
    }

    pub fn put_f32(&mut self, value: f32) -> &mut Self {
        self.buf.extend_from_slice(&f32_to_bytes_le(value));
        self
    }

    /// 写入 ASCII 字符串（非 ASCII 字符返回错误）
    pub fn put_ascii(&mut self, value: &str) -> Result<&mut Self, ProtocolError> {
        if let Some((index, byte)) = value.bytes().enumerate().find(|(_, b)| !b.is_ascii()) {
            return Err(ProtocolError::NonAscii { index, byte });
        }
        self.buf.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// 负载解析器
///
/// 按顺序读取字段；读取越界返回 `PayloadTooShort`。
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::PayloadTooShort {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.u8()? != 0)
    }

    pub fn f32(&mut self) -> Result<f32, ProtocolError> {
        let bytes = self.take(4)?;
        Ok(bytes_to_f32_le([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// 读取剩余全部字节作为 ASCII 字符串，去掉末尾 NUL
    pub fn ascii_rest(&mut self) -> Result<String, ProtocolError> {
        let rest = self.take(self.remaining())?;
        decode_ascii(rest)
    }

    /// 确认负载已被完全消费
    pub fn finish(self) -> Result<(), ProtocolError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(ProtocolError::TrailingBytes { count }),
        }
    }
}

/// 解码 ASCII 字符串，去掉末尾 NUL 填充
pub fn decode_ascii(bytes: &[u8]) -> Result<String, ProtocolError> {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let trimmed = &bytes[..end];
    if let Some((index, &byte)) = trimmed.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
        return Err(ProtocolError::NonAscii { index, byte });
    }
    Ok(trimmed.iter().map(|&b| b as char).collect())
}
