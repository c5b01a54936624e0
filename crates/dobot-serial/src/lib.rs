//! # Dobot Serial Transport
//!
//! 串口传输抽象层：打开/关闭物理链路、发送原始字节、在有限等待时间内读取原始字节。
//!
//! - [`SerialTransport`]: 基于 `serialport` 的真实串口实现
//! - [`MockTransport`]: 脚本化应答的测试替身（`mock` feature）
//!
//! 传输层不理解指令语义，只在轮询读取时借助 [`dobot_protocol::scan_frame`] 判断帧是否收齐。

use std::time::Duration;
use thiserror::Error;

pub mod serial;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use serial::{SerialSettings, SerialTransport};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEvent, MockHandle, MockReply, MockTransport};

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Serial port not open")]
    NotConnected,
    #[error("Failed to open port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// 读取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReadStrategy {
    /// 短间隔轮询，帧收齐（或确定非法）即返回，不超过截止时间
    #[default]
    Poll,
    /// 旧行为：先睡满整个窗口，再读取已到达的字节
    FullWindow,
}

/// 传输层抽象
///
/// 半双工：调用方负责保证同一时刻只有一个请求在途。
pub trait Transport: Send {
    /// 打开链路
    fn connect(&mut self, port: &str, timeout: Duration) -> Result<(), TransportError>;

    /// 关闭链路（幂等）
    fn disconnect(&mut self);

    /// 链路是否打开
    fn is_connected(&self) -> bool;

    /// 发送原始字节
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// 在 `timeout` 内读取原始字节
    ///
    /// 没有收到任何数据时返回空 `Vec`；只有 IO 故障才返回 `Err`。
    fn read(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self, port: &str, timeout: Duration) -> Result<(), TransportError> {
        (**self).connect(port, timeout)
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }

    fn read(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        (**self).read(timeout)
    }
}

/// 串口信息
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortInfo {
    pub name: String,
    pub description: String,
}

/// 枚举系统中的串口
///
/// 枚举失败时返回空列表（仅用于诊断）。
pub fn available_ports() -> Vec<PortInfo> {
    match serialport::available_ports() {
        Ok(ports) => ports
            .into_iter()
            .map(|p| PortInfo {
                description: describe_port_type(&p.port_type),
                name: p.port_name,
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to enumerate serial ports: {}", e);
            Vec::new()
        },
    }
}

fn describe_port_type(port_type: &serialport::SerialPortType) -> String {
    match port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("USB serial");
            format!("{} ({:04x}:{:04x})", product, usb.vid, usb.pid)
        },
        serialport::SerialPortType::PciPort => "PCI".to_string(),
        serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        serialport::SerialPortType::Unknown => "Unknown".to_string(),
    }
}
