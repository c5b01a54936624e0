//! 指令执行器
//!
//! 单条指令的完整流程：
//!
//! 1. 链路未打开 → `NotConnected`（不发送）
//! 2. 编码负载并组帧（编码失败 → `InvalidFraming`）
//! 3. 发送（失败 → `SendFailure`）
//! 4. 在应答窗口内读取（空 → `NoResponse`）
//! 5. 校验帧（失败 → `InvalidFraming`）
//! 6. 解析负载（失败 → `ParseFailure`）
//!
//! 传输层由互斥锁保护，锁在 1–6 全程持有：同一时刻只有一条指令在途，发送与读取不会交错。
//! 不做重试。

use crate::command::{CommandResponse, DobotCommand};
use crate::error::CommunicationError;
use crate::metrics::{ExecutorMetrics, MetricsSnapshot};
use crate::types::{LiftHeight, MovementProfile, Position};
use dobot_protocol::{ProtocolError, PtpMode, encode_request, validate_response};
use dobot_serial::{Transport, TransportError};
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// 默认应答窗口
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(200);

/// 执行器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// 发送后等待应答的时间
    pub response_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// 指令执行器
///
/// 独占一个传输层实例，生命周期内不更换。
///
/// # Example
///
/// ```
/// use dobot_driver::CommandExecutor;
/// use dobot_serial::MockTransport;
///
/// let mock = MockTransport::connected_echo();
/// mock.handle().set_echo_payload(1, b"MyDobot".to_vec());
///
/// let executor = CommandExecutor::new(mock);
/// assert_eq!(executor.get_device_name().unwrap(), "MyDobot");
/// ```
pub struct CommandExecutor<T: Transport> {
    transport: Mutex<T>,
    config: ExecutorConfig,
    metrics: ExecutorMetrics,
}

impl<T: Transport> CommandExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExecutorConfig::default())
    }

    pub fn with_config(transport: T, config: ExecutorConfig) -> Self {
        Self {
            transport: Mutex::new(transport),
            config,
            metrics: ExecutorMetrics::new(),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// 打开底层链路
    ///
    /// 与指令执行共用同一把锁，不会与在途指令交错。
    pub fn connect(&self, port: &str, timeout: Duration) -> Result<(), TransportError> {
        self.transport.lock().connect(port, timeout)
    }

    /// 关闭底层链路（幂等）
    pub fn disconnect(&self) {
        self.transport.lock().disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.transport.lock().is_connected()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 执行一条指令
    pub fn execute(&self, command: &DobotCommand) -> Result<CommandResponse, CommunicationError> {
        self.metrics.commands_total.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();

        let result = {
            let mut transport = self.transport.lock();
            self.execute_locked(&mut *transport, command)
        };

        match &result {
            Ok(_) => {
                self.metrics.commands_ok.fetch_add(1, Ordering::Relaxed);
                debug!("{} completed in {:?}", command.name(), start.elapsed());
            },
            Err(e) => {
                self.metrics.record_error(e);
                debug!("{} failed: {}", command.name(), e);
            },
        }
        result
    }

    fn execute_locked(&self, transport: &mut T, command: &DobotCommand) -> Result<CommandResponse, CommunicationError> {
        if !transport.is_connected() {
            debug!("Cannot execute {}: not connected", command.name());
            return Err(CommunicationError::NotConnected);
        }

        let command_id = command.command_id().as_u8();
        let payload = command.encode_payload().map_err(CommunicationError::InvalidFraming)?;
        let frame = encode_request(command_id, command.control().to_byte(), &payload)
            .map_err(CommunicationError::InvalidFraming)?;

        debug!(
            "Executing {} (id={}, queued={}, {} byte payload)",
            command.name(),
            command_id,
            command.queued(),
            payload.len()
        );

        transport.send(&frame)?;
        self.metrics
            .bytes_sent
            .fetch_add(frame.len() as u64, Ordering::Relaxed);

        let response = match transport.read(self.config.response_timeout) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Error reading response to {}: {}", command.name(), e);
                return Err(CommunicationError::NoResponse);
            },
        };
        if response.is_empty() {
            return Err(CommunicationError::NoResponse);
        }
        self.metrics
            .bytes_received
            .fetch_add(response.len() as u64, Ordering::Relaxed);
        trace!("{} response: {} bytes", command.name(), response.len());

        let body = validate_response(&response, command_id).map_err(CommunicationError::InvalidFraming)?;
        command
            .decode_response(body)
            .map_err(CommunicationError::ParseFailure)
    }

    fn execute_ack(&self, command: DobotCommand) -> Result<(), CommunicationError> {
        self.execute(&command).map(|_| ())
    }

    fn execute_text(&self, command: DobotCommand) -> Result<String, CommunicationError> {
        let id = command.command_id().as_u8();
        self.execute(&command)?
            .into_text()
            .ok_or_else(|| unexpected_response(id))
    }

    /// 查询设备序列号
    pub fn get_serial_number(&self) -> Result<String, CommunicationError> {
        self.execute_text(DobotCommand::GetDeviceSerialNumber)
    }

    /// 查询设备名称
    pub fn get_device_name(&self) -> Result<String, CommunicationError> {
        self.execute_text(DobotCommand::GetDeviceName)
    }

    pub fn set_device_name(&self, name: &str) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::SetDeviceName {
            name: name.to_string(),
        })
    }

    pub fn move_to_position(&self, mode: PtpMode, position: Position, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::MoveToPosition {
            mode,
            position,
            queued,
        })
    }

    pub fn go_home(&self, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::GoHome { queued })
    }

    pub fn set_vacuum_state(&self, enabled: bool, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::SetVacuumState { enabled, queued })
    }

    pub fn execute_queue(&self) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::ExecuteQueue)
    }

    pub fn clear_queue(&self) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::ClearQueue)
    }

    pub fn stop_queue(&self) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::StopQueue)
    }

    pub fn set_movement_profile(&self, profile: MovementProfile, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::SetMovementProfile { profile, queued })
    }

    pub fn get_movement_profile(&self) -> Result<MovementProfile, CommunicationError> {
        let command = DobotCommand::GetMovementProfile;
        let id = command.command_id().as_u8();
        self.execute(&command)?
            .into_movement_profile()
            .ok_or_else(|| unexpected_response(id))
    }

    pub fn set_lift_height(&self, params: LiftHeight, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::SetLiftHeight { params, queued })
    }

    pub fn set_default_home(&self, position: Position, queued: bool) -> Result<(), CommunicationError> {
        self.execute_ack(DobotCommand::SetDefaultHome { position, queued })
    }
}

fn unexpected_response(command_id: u8) -> CommunicationError {
    CommunicationError::ParseFailure(ProtocolError::InvalidValue {
        field: "response kind".to_string(),
        value: command_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dobot_protocol::{CommandId, encode_request};
    use dobot_serial::{MockEvent, MockHandle, MockTransport};
    use std::sync::Arc;
    use std::thread;

    fn connected() -> (CommandExecutor<MockTransport>, MockHandle) {
        let mock = MockTransport::new();
        let handle = mock.handle();
        let executor = CommandExecutor::new(mock);
        executor.connect("COM3", Duration::from_millis(3000)).unwrap();
        handle.clear_events();
        (executor, handle)
    }

    /// 收集日志输出的写入端
    #[derive(Clone, Default)]
    struct LogCapture(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failures_not_logged_above_debug() {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let executor = CommandExecutor::new(MockTransport::new());
            assert!(matches!(executor.go_home(true), Err(CommunicationError::NotConnected)));

            let (executor, handle) = connected();
            handle.push_silence();
            assert!(matches!(executor.go_home(true), Err(CommunicationError::NoResponse)));
        });

        let output = String::from_utf8_lossy(&capture.0.lock()).into_owned();
        assert!(output.is_empty(), "unexpected log output: {}", output);
    }

    #[test]
    fn test_get_device_name() {
        let (executor, handle) = connected();
        handle.push_frame(CommandId::DeviceName.as_u8(), b"MyDobot".to_vec());

        assert_eq!(executor.get_device_name().unwrap(), "MyDobot");
        assert_eq!(handle.sent(), vec![vec![0xAA, 0xAA, 0x02, 0x01, 0x00, 0xFF]]);
    }

    #[test]
    fn test_not_connected_never_sends() {
        let mock = MockTransport::new();
        let handle = mock.handle();
        let executor = CommandExecutor::new(mock);

        assert!(matches!(
            executor.go_home(true),
            Err(CommunicationError::NotConnected)
        ));
        assert!(handle.events().is_empty());
        assert_eq!(executor.metrics().not_connected, 1);
    }

    #[test]
    fn test_timeout_is_no_response_after_one_send() {
        let (executor, handle) = connected();
        handle.push_silence();

        assert!(matches!(
            executor.clear_queue(),
            Err(CommunicationError::NoResponse)
        ));
        assert_eq!(handle.send_count(), 1);
        assert_eq!(handle.read_count(), 1);
    }

    #[test]
    fn test_read_error_is_no_response() {
        let (executor, handle) = connected();
        handle.push_read_error();

        assert!(matches!(
            executor.execute_queue(),
            Err(CommunicationError::NoResponse)
        ));
    }

    #[test]
    fn test_send_failure() {
        let (executor, handle) = connected();
        handle.fail_next_sends(1);

        assert!(matches!(
            executor.stop_queue(),
            Err(CommunicationError::SendFailure(_))
        ));
        assert_eq!(handle.read_count(), 0);
    }

    #[test]
    fn test_invalid_framing() {
        let (executor, handle) = connected();

        // 错误的指令 ID
        handle.push_frame(CommandId::HomeCommand.as_u8(), Vec::new());
        assert!(matches!(
            executor.set_vacuum_state(true, false),
            Err(CommunicationError::InvalidFraming(ProtocolError::CommandIdMismatch { .. }))
        ));

        // 校验和错误
        let mut bad = encode_request(CommandId::SuctionCup.as_u8(), 0, &[]).unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;
        handle.push_reply(bad);
        assert!(matches!(
            executor.set_vacuum_state(true, false),
            Err(CommunicationError::InvalidFraming(ProtocolError::ChecksumMismatch { .. }))
        ));
    }

    #[test]
    fn test_unencodable_request_is_invalid_framing() {
        let (executor, handle) = connected();
        assert!(matches!(
            executor.set_device_name("Dobot\u{2122}"),
            Err(CommunicationError::InvalidFraming(ProtocolError::NonAscii { .. }))
        ));
        assert_eq!(handle.send_count(), 0);
    }

    #[test]
    fn test_parse_failure() {
        let (executor, handle) = connected();
        handle.push_frame(CommandId::PtpCoordinateParams.as_u8(), vec![0u8; 8]);

        assert!(matches!(
            executor.get_movement_profile(),
            Err(CommunicationError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_move_frame_on_wire() {
        let (executor, handle) = connected();
        handle.set_echo_ack(true);

        executor
            .move_to_position(PtpMode::MovlXyz, Position::new(200.0, 0.0, 50.0, 0.0), true)
            .unwrap();

        let sent = handle.sent();
        assert_eq!(sent.len(), 1);
        let frame = &sent[0];
        assert_eq!(frame.len(), 24);
        assert_eq!(frame[2], 20);
        assert_eq!(frame[3], 84);
        assert_eq!(frame[4], 0x01);
    }

    #[test]
    fn test_metrics_count_bytes() {
        let (executor, handle) = connected();
        handle.set_echo_ack(true);

        executor.go_home(false).unwrap();
        let snapshot = executor.metrics();
        assert_eq!(snapshot.commands_total, 1);
        assert_eq!(snapshot.commands_ok, 1);
        assert_eq!(snapshot.bytes_sent, 7);
        // 回显应答不带负载
        assert_eq!(snapshot.bytes_received, 6);
    }

    #[test]
    fn test_concurrent_execute_is_serialized() {
        let (executor, handle) = connected();
        handle.set_echo_ack(true);
        handle.set_read_delay(Duration::from_millis(2));
        let executor = Arc::new(executor);

        let (start_tx, start_rx) = crossbeam_channel::bounded::<()>(0);
        let workers: Vec<_> = (0..2)
            .map(|i| {
                let executor = Arc::clone(&executor);
                let start_rx = start_rx.clone();
                thread::spawn(move || {
                    start_rx.recv().unwrap();
                    for _ in 0..10 {
                        if i == 0 {
                            executor.go_home(true).unwrap();
                        } else {
                            executor.set_vacuum_state(true, true).unwrap();
                        }
                    }
                })
            })
            .collect();
        for _ in 0..2 {
            start_tx.send(()).unwrap();
        }
        for worker in workers {
            worker.join().unwrap();
        }

        let events = handle.events();
        assert_eq!(events.len(), 40);
        for pair in events.chunks(2) {
            let MockEvent::Send(sent) = &pair[0] else {
                panic!("expected Send, got {:?}", pair[0]);
            };
            let MockEvent::Read(read) = &pair[1] else {
                panic!("expected Read, got {:?}", pair[1]);
            };
            // 每条应答都对应紧邻的请求
            assert_eq!(sent[3], read[3]);
        }
    }
}
