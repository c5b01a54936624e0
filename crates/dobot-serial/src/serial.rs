//! 基于 `serialport` 的串口传输实现
//!
//! 线路参数：8 数据位、1 停止位、无校验、无流控，波特率默认 115200。

use crate::{DEFAULT_BAUD_RATE, ReadStrategy, Transport, TransportError, available_ports};
use dobot_protocol::{FrameScan, hex_dump, scan_frame};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// 单次读取缓冲区大小（大于最长帧 259 字节）
const READ_CHUNK: usize = 512;

/// 串口参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub read_strategy: ReadStrategy,
    /// 轮询读取间隔（仅 `ReadStrategy::Poll` 使用）
    pub poll_interval: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_strategy: ReadStrategy::Poll,
            poll_interval: Duration::from_millis(5),
        }
    }
}

/// 串口传输
///
/// 独占物理句柄；`disconnect` 或 `Drop` 时关闭。
///
/// # Example
///
/// ```no_run
/// use dobot_serial::{ReadStrategy, SerialTransport, Transport};
/// use std::time::Duration;
///
/// let mut transport = SerialTransport::new()
///     .with_baud_rate(115_200)
///     .with_read_strategy(ReadStrategy::Poll);
/// transport.connect("/dev/ttyUSB0", Duration::from_millis(3000))?;
/// # Ok::<(), dobot_serial::TransportError>(())
/// ```
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    port_name: Option<String>,
    settings: SerialSettings,
}

impl SerialTransport {
    pub fn new() -> Self {
        Self::with_settings(SerialSettings::default())
    }

    pub fn with_settings(settings: SerialSettings) -> Self {
        Self {
            port: None,
            port_name: None,
            settings,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.settings.baud_rate = baud_rate;
        self
    }

    pub fn with_read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.settings.read_strategy = strategy;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// 当前打开的串口名
    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    fn log_available_ports() {
        let ports = available_ports();
        info!("Available serial ports:");
        if ports.is_empty() {
            info!("  (none)");
        }
        for port in ports {
            info!("  - {} ({})", port.name, port.description);
        }
    }
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SerialTransport {
    fn connect(&mut self, port: &str, timeout: Duration) -> Result<(), TransportError> {
        info!("Connecting to Dobot on port: {}", port);
        Self::log_available_ports();

        if self.port.is_some() {
            warn!("Port already open, closing previous connection first");
            self.disconnect();
        }

        let opened = serialport::new(port, self.settings.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|source| {
                error!("Failed to open serial port {}: {}", port, source);
                TransportError::Open {
                    port: port.to_string(),
                    source,
                }
            })?;

        self.port = Some(opened);
        self.port_name = Some(port.to_string());
        info!(
            "Successfully connected to port: {} ({} baud, {:?} read)",
            port, self.settings.baud_rate, self.settings.read_strategy
        );
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.flush() {
                warn!("Error flushing serial port on close: {}", e);
            }
            drop(port);
            info!(
                "Disconnected from Dobot ({})",
                self.port_name.take().unwrap_or_default()
            );
        }
    }

    fn is_connected(&self) -> bool {
        let connected = self.port.is_some();
        trace!(
            "Dobot connection status: {}",
            if connected { "Connected" } else { "Not Connected" }
        );
        connected
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let Some(port) = self.port.as_mut() else {
            error!("Cannot send data: serial port not open");
            return Err(TransportError::NotConnected);
        };

        // 丢弃上一条指令的迟到应答
        port.clear(ClearBuffer::Input)?;
        port.write_all(bytes)?;
        port.flush()?;

        trace!("Sent {} bytes:\n{}", bytes.len(), hex_dump(bytes));
        Ok(())
    }

    fn read(&mut self, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let settings = self.settings;
        let Some(port) = self.port.as_mut() else {
            error!("Cannot read data: serial port not open");
            return Err(TransportError::NotConnected);
        };

        let data = match settings.read_strategy {
            ReadStrategy::Poll => read_polling(port, timeout, settings.poll_interval)?,
            ReadStrategy::FullWindow => read_full_window(port, timeout)?,
        };

        if data.is_empty() {
            debug!("No data received within {:?}", timeout);
        } else {
            trace!("Received {} bytes:\n{}", data.len(), hex_dump(&data));
        }
        Ok(data)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// 读取字节源（串口的最小抽象，便于在无硬件时测试读取策略）
pub(crate) trait ByteSource {
    /// 输入缓冲区中可立即读取的字节数
    fn available(&mut self) -> io::Result<usize>;

    /// 读取至多 `buf.len()` 字节
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl ByteSource for Box<dyn SerialPort> {
    fn available(&mut self) -> io::Result<usize> {
        self.bytes_to_read()
            .map(|n| n as usize)
            .map_err(io::Error::from)
    }

    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }
}

/// 读取当前已到达的全部字节（不阻塞等待新数据）
fn drain_available<S: ByteSource + ?Sized>(source: &mut S, out: &mut Vec<u8>) -> io::Result<()> {
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let available = source.available()?;
        if available == 0 {
            return Ok(());
        }
        let want = available.min(READ_CHUNK);
        match source.read_some(&mut chunk[..want]) {
            Ok(0) => return Ok(()),
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
            Err(e) => return Err(e),
        }
    }
}

/// 轮询读取：帧收齐或确定非法即返回，最长等待 `timeout`
pub(crate) fn read_polling<S: ByteSource + ?Sized>(
    source: &mut S,
    timeout: Duration,
    poll_interval: Duration,
) -> io::Result<Vec<u8>> {
    let deadline = Instant::now() + timeout;
    let mut buf = Vec::new();

    loop {
        drain_available(source, &mut buf)?;

        if !buf.is_empty() {
            match scan_frame(&buf) {
                FrameScan::Complete(_) | FrameScan::Invalid => return Ok(buf),
                FrameScan::Incomplete => {},
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(buf);
        }
        spin_sleep::sleep(poll_interval.min(deadline - now));
    }
}

/// 整窗读取：先等满 `timeout`，再读取已到达的字节
pub(crate) fn read_full_window<S: ByteSource + ?Sized>(
    source: &mut S,
    timeout: Duration,
) -> io::Result<Vec<u8>> {
    spin_sleep::sleep(timeout);
    let mut buf = Vec::new();
    drain_available(source, &mut buf)?;
    Ok(buf)
}
