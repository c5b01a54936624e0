//! 驱动层错误类型定义

use dobot_protocol::ProtocolError;
use dobot_serial::TransportError;
use thiserror::Error;

/// 指令执行错误
///
/// 每一种传输层或协议层故障都归约到这五类之一。
#[derive(Error, Debug)]
pub enum CommunicationError {
    /// 链路未打开，指令未发送
    #[error("Not connected to Dobot")]
    NotConnected,

    /// 发送失败
    #[error("Failed to send command: {0}")]
    SendFailure(#[from] TransportError),

    /// 应答窗口内没有收到任何字节（读取 IO 故障也归入此类）
    #[error("No response from Dobot")]
    NoResponse,

    /// 帧结构错误（帧头、长度、校验和、指令 ID，或请求无法编码）
    #[error("Invalid response framing: {0}")]
    InvalidFraming(ProtocolError),

    /// 负载无法解析为期望的结果
    #[error("Failed to parse response: {0}")]
    ParseFailure(ProtocolError),
}

impl CommunicationError {
    /// 用于指标与日志的分类名
    pub fn kind(&self) -> &'static str {
        match self {
            CommunicationError::NotConnected => "not_connected",
            CommunicationError::SendFailure(_) => "send_failure",
            CommunicationError::NoResponse => "no_response",
            CommunicationError::InvalidFraming(_) => "invalid_framing",
            CommunicationError::ParseFailure(_) => "parse_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communication_error_display() {
        assert_eq!(CommunicationError::NotConnected.to_string(), "Not connected to Dobot");
        assert_eq!(CommunicationError::NoResponse.to_string(), "No response from Dobot");

        let err = CommunicationError::InvalidFraming(ProtocolError::ChecksumMismatch {
            expected: 0x01,
            actual: 0x02,
        });
        let msg = err.to_string();
        assert!(msg.contains("Invalid response framing") && msg.contains("Checksum"), "{}", msg);

        let err = CommunicationError::ParseFailure(ProtocolError::PayloadTooShort {
            needed: 4,
            remaining: 0,
        });
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[test]
    fn test_from_transport_error() {
        let err: CommunicationError = TransportError::NotConnected.into();
        match err {
            CommunicationError::SendFailure(TransportError::NotConnected) => {},
            other => panic!("Expected SendFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(CommunicationError::NoResponse.kind(), "no_response");
        assert_eq!(
            CommunicationError::InvalidFraming(ProtocolError::InvalidLength { declared: 0 }).kind(),
            "invalid_framing"
        );
    }
}
