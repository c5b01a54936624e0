//! 机器人门面
//!
//! 管理链路生命周期（启动时连接并探活，关闭时断开），对外提供不抛错的领域 API：
//! 所有 [`CommunicationError`] 在这一层被记录日志并降级为 `false` / `None`。
//! 需要具体错误时直接使用 [`DobotService::executor`]。

use crate::config::DobotConfig;
use crate::status::DeviceStatus;
use dobot_driver::{
    CommandExecutor, CommunicationError, LiftHeight, MetricsSnapshot, MovementProfile, Position,
    PtpMode, Transport,
};
use dobot_serial::SerialTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

/// Dobot 服务
///
/// `Send + Sync`，可以放在 `Arc` 中被多个请求线程共享；指令在执行器内部串行化。
///
/// # Example
///
/// ```no_run
/// use dobot_client::{DobotConfig, DobotService};
/// use dobot_driver::PtpMode;
///
/// let service = DobotService::open(DobotConfig::new("/dev/ttyUSB0"));
/// if service.start() {
///     service.move_to_position(PtpMode::MovlXyz, 200.0, 0.0, 50.0, 0.0);
///     service.execute_queue();
/// }
/// service.shutdown();
/// ```
pub struct DobotService<T: Transport> {
    executor: CommandExecutor<T>,
    config: DobotConfig,
    initialized: AtomicBool,
}

impl DobotService<SerialTransport> {
    /// 使用真实串口创建（尚未连接）
    pub fn open(config: DobotConfig) -> Self {
        let transport = SerialTransport::with_settings(config.serial_settings());
        Self::new(transport, config)
    }
}

impl<T: Transport> DobotService<T> {
    pub fn new(transport: T, config: DobotConfig) -> Self {
        let executor = CommandExecutor::with_config(transport, config.executor_config());
        Self {
            executor,
            config,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &DobotConfig {
        &self.config
    }

    /// 底层执行器（返回具体错误类型）
    pub fn executor(&self) -> &CommandExecutor<T> {
        &self.executor
    }

    /// 连接并探活
    ///
    /// 只有设备返回非空序列号时才标记为已初始化。返回是否初始化成功。
    pub fn start(&self) -> bool {
        let port = &self.config.port_name;
        self.initialized.store(false, Ordering::Release);

        if self.executor.is_connected() {
            info!("Already connected to Dobot");
        } else if let Err(e) = self.executor.connect(port, self.config.timeout()) {
            error!("Failed to connect to Dobot on port {}: {}", port, e);
            return false;
        }

        if self.ping() {
            info!("Dobot successfully initialized and responding on port: {}", port);
            self.initialized.store(true, Ordering::Release);
            true
        } else {
            warn!("Dobot connected but not responding to ping on port: {}", port);
            false
        }
    }

    /// 断开链路并清除初始化标记（幂等）
    pub fn shutdown(&self) {
        self.executor.disconnect();
        if self.initialized.swap(false, Ordering::AcqRel) {
            info!("Dobot service shut down");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.executor.is_connected()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// 探活：查询序列号，非空即成功
    pub fn ping(&self) -> bool {
        debug!("Pinging Dobot for serial number...");
        let ok = match self.executor.get_serial_number() {
            Ok(sn) => !sn.is_empty(),
            Err(e) => {
                warn!("Ping failed: {}", e);
                false
            },
        };
        info!("Ping result: {}", if ok { "Success" } else { "Failed" });
        ok
    }

    pub fn get_serial_number(&self) -> Option<String> {
        self.executor
            .get_serial_number()
            .map_err(|e| log_failure("get serial number", &e))
            .ok()
    }

    pub fn get_device_name(&self) -> Option<String> {
        debug!("Retrieving Dobot device name...");
        self.executor
            .get_device_name()
            .map_err(|e| log_failure("get device name", &e))
            .ok()
    }

    pub fn set_device_name(&self, name: &str) -> bool {
        debug!("Setting Dobot device name to: {}", name);
        succeeded("set device name", self.executor.set_device_name(name))
    }

    pub fn move_to_position(&self, mode: PtpMode, x: f32, y: f32, z: f32, r: f32) -> bool {
        let position = Position::new(x, y, z, r);
        debug!("Moving Dobot to {} with mode {}", position, mode);
        succeeded(
            "move",
            self.executor
                .move_to_position(mode, position, self.config.queue_commands),
        )
    }

    pub fn go_home(&self) -> bool {
        debug!("Sending Dobot to home position...");
        succeeded("go home", self.executor.go_home(self.config.queue_commands))
    }

    pub fn set_vacuum_state(&self, enabled: bool) -> bool {
        debug!(
            "Setting vacuum state to: {}",
            if enabled { "Activated" } else { "Deactivated" }
        );
        succeeded(
            "set vacuum state",
            self.executor
                .set_vacuum_state(enabled, self.config.queue_commands),
        )
    }

    pub fn execute_queue(&self) -> bool {
        debug!("Executing command queue on Dobot...");
        succeeded("execute command queue", self.executor.execute_queue())
    }

    pub fn clear_queue(&self) -> bool {
        debug!("Clearing command queue on Dobot...");
        succeeded("clear command queue", self.executor.clear_queue())
    }

    pub fn stop_queue(&self) -> bool {
        debug!("Stopping command queue on Dobot...");
        succeeded("stop command queue", self.executor.stop_queue())
    }

    pub fn set_movement_config(
        &self,
        xyz_velocity: f32,
        r_velocity: f32,
        xyz_acceleration: f32,
        r_acceleration: f32,
    ) -> bool {
        let profile = MovementProfile::new(xyz_velocity, r_velocity, xyz_acceleration, r_acceleration);
        debug!("Setting movement configuration: {:?}", profile);
        succeeded(
            "set movement configuration",
            self.executor
                .set_movement_profile(profile, self.config.queue_commands),
        )
    }

    pub fn get_movement_config(&self) -> Option<MovementProfile> {
        self.executor
            .get_movement_profile()
            .map_err(|e| log_failure("get movement configuration", &e))
            .ok()
    }

    pub fn set_lift_height(&self, jump_height: f32, max_height: f32) -> bool {
        debug!(
            "Setting lift height: {} with absolute max height {}",
            jump_height, max_height
        );
        succeeded(
            "set lift height",
            self.executor.set_lift_height(
                LiftHeight::new(jump_height, max_height),
                self.config.queue_commands,
            ),
        )
    }

    pub fn set_default_home(&self, x: f32, y: f32, z: f32, r: f32) -> bool {
        let position = Position::new(x, y, z, r);
        debug!("Setting default home position: {}", position);
        succeeded(
            "set default home",
            self.executor
                .set_default_home(position, self.config.queue_commands),
        )
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.executor.metrics()
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            port_name: self.config.port_name.clone(),
            connected: self.is_connected(),
            initialized: self.is_initialized(),
            queue_commands: self.config.queue_commands,
            metrics: self.metrics(),
        }
    }
}

impl<T: Transport> Drop for DobotService<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_failure(action: &str, error: &CommunicationError) {
    error!("Failed to {}: {}", action, error);
}

fn succeeded(action: &str, result: Result<(), CommunicationError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log_failure(action, &e);
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dobot_protocol::{CommandId, Frame};
    use dobot_serial::{MockEvent, MockHandle, MockTransport};

    fn service() -> (DobotService<MockTransport>, MockHandle) {
        let mock = MockTransport::new();
        let handle = mock.handle();
        handle.set_echo_ack(true);
        handle.set_echo_payload(CommandId::DeviceSerialNumber.as_u8(), b"DT1234567".to_vec());
        (DobotService::new(mock, DobotConfig::new("COM3")), handle)
    }

    #[test]
    fn test_start_initializes_on_probe_answer() {
        let (service, handle) = service();
        assert!(service.start());
        assert!(service.is_connected());
        assert!(service.is_initialized());
        assert_eq!(handle.port().as_deref(), Some("COM3"));
        assert_eq!(handle.send_count(), 1);
    }

    #[test]
    fn test_silent_device_connected_not_initialized() {
        let (service, handle) = service();
        handle.set_echo_ack(false);

        assert!(!service.start());
        assert!(service.is_connected());
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_restart_against_silent_device_clears_initialized() {
        let (service, handle) = service();
        assert!(service.start());
        assert!(service.is_initialized());

        handle.set_echo_ack(false);
        assert!(!service.start());
        assert!(service.is_connected());
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_restart_after_link_loss_clears_initialized() {
        let (service, handle) = service();
        assert!(service.start());

        handle.drop_link();
        handle.set_connect_failure(true);
        assert!(!service.start());
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_empty_serial_number_is_not_alive() {
        let (service, handle) = service();
        handle.set_echo_payload(CommandId::DeviceSerialNumber.as_u8(), Vec::new());

        assert!(!service.start());
        assert!(!service.is_initialized());
    }

    #[test]
    fn test_connect_failure() {
        let (service, handle) = service();
        handle.set_connect_failure(true);

        assert!(!service.start());
        assert!(!service.is_connected());
        assert_eq!(handle.send_count(), 0);
    }

    #[test]
    fn test_start_when_already_connected_skips_connect() {
        let (service, handle) = service();
        assert!(service.start());
        assert!(service.start());
        let connects = handle
            .events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Connect { .. }))
            .count();
        assert_eq!(connects, 1);
    }

    #[test]
    fn test_shutdown_idempotent() {
        let (service, handle) = service();
        service.start();
        service.shutdown();
        service.shutdown();

        assert!(!service.is_connected());
        assert!(!service.is_initialized());
        let disconnects = handle
            .events()
            .iter()
            .filter(|e| matches!(e, MockEvent::Disconnect))
            .count();
        assert_eq!(disconnects, 1);
    }

    #[test]
    fn test_drop_disconnects() {
        let (service, handle) = service();
        service.start();
        drop(service);
        assert!(!handle.is_connected());
    }

    #[test]
    fn test_fail_fast_when_disconnected() {
        let (service, handle) = service();

        assert!(!service.go_home());
        assert!(!service.set_vacuum_state(true));
        assert!(!service.move_to_position(PtpMode::MovlXyz, 200.0, 0.0, 50.0, 0.0));
        assert!(!service.execute_queue());
        assert!(!service.clear_queue());
        assert!(!service.stop_queue());
        assert!(!service.set_movement_config(100.0, 100.0, 80.0, 80.0));
        assert!(!service.set_lift_height(20.0, 100.0));
        assert!(!service.set_default_home(200.0, 0.0, 50.0, 0.0));
        assert!(!service.set_device_name("MyDobot"));
        assert_eq!(service.get_serial_number(), None);
        assert_eq!(service.get_device_name(), None);
        assert_eq!(service.get_movement_config(), None);

        assert!(handle.events().is_empty());
        assert_eq!(service.metrics().not_connected, 13);
    }

    #[test]
    fn test_queue_flag_follows_config() {
        let (service, handle) = service();
        service.start();
        handle.clear_events();

        assert!(service.go_home());
        let sent = Frame::parse(&handle.sent()[0]).unwrap();
        assert!(sent.control.queued());
        assert_eq!(sent.payload, vec![0x01]);

        let mock = MockTransport::connected_echo();
        let handle = mock.handle();
        let service = DobotService::new(mock, DobotConfig::new("COM3").with_queue_commands(false));
        assert!(service.set_vacuum_state(true));
        let sent = Frame::parse(&handle.sent()[0]).unwrap();
        assert!(!sent.control.queued());
        assert_eq!(sent.payload, vec![0x01, 0x00]);
    }

    #[test]
    fn test_queue_operations_never_queued() {
        let (service, handle) = service();
        service.start();
        handle.clear_events();

        assert!(service.execute_queue());
        assert!(service.clear_queue());
        assert!(service.stop_queue());
        for bytes in handle.sent() {
            let frame = Frame::parse(&bytes).unwrap();
            assert!(!frame.control.queued());
            assert!(frame.payload.is_empty());
        }
    }

    #[test]
    fn test_domain_methods_round_trip() {
        let (service, handle) = service();
        service.start();
        handle.set_echo_payload(CommandId::DeviceName.as_u8(), b"MyDobot".to_vec());

        assert_eq!(service.get_serial_number().as_deref(), Some("DT1234567"));
        assert_eq!(service.get_device_name().as_deref(), Some("MyDobot"));
        assert!(service.set_device_name("Line-2"));
        assert!(service.set_movement_config(100.0, 100.0, 80.0, 80.0));
        assert!(service.set_lift_height(20.0, 100.0));
        assert!(service.set_default_home(200.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_response_degrades_to_false() {
        let (service, handle) = service();
        service.start();
        handle.set_echo_ack(false);

        assert!(!service.go_home());
        assert_eq!(service.get_device_name(), None);
        assert_eq!(service.metrics().no_response, 2);
    }

    #[test]
    fn test_status() {
        let (service, _handle) = service();
        service.start();

        let status = service.status();
        assert_eq!(status.port_name, "COM3");
        assert!(status.connected);
        assert!(status.initialized);
        assert!(status.queue_commands);
        assert_eq!(status.metrics.commands_ok, 1);
    }
}
