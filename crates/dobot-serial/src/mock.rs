//! Mock 传输层（无硬件依赖）
//!
//! 应答来源优先级：脚本化应答队列 → 回显确认模式 → 静默（空读取）。
//! [`MockHandle`] 与 [`MockTransport`] 共享内部状态，传输层被移交给执行器后仍可检查事件日志。

use crate::{Transport, TransportError};
use dobot_protocol::{ControlFlags, Frame};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// 事件日志条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Connect { port: String },
    Send(Vec<u8>),
    Read(Vec<u8>),
    Disconnect,
}

/// 单次读取的脚本化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// 返回这些字节
    Bytes(Vec<u8>),
    /// 什么都没收到
    Silence,
    /// IO 故障
    ReadError,
}

#[derive(Debug, Default)]
struct MockState {
    connected: bool,
    port: Option<String>,
    events: Vec<MockEvent>,
    replies: VecDeque<MockReply>,
    echo_ack: bool,
    /// 回显模式下按指令 ID 返回的负载
    echo_payloads: HashMap<u8, Vec<u8>>,
    last_sent: Option<Vec<u8>>,
    fail_sends: usize,
    fail_connect: bool,
    read_delay: Duration,
}

/// Mock 传输层
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// 共享状态句柄（用于脚本化与检查）
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已连接、回显确认模式的实例
    pub fn connected_echo() -> Self {
        let mock = Self::new();
        {
            let mut state = mock.state.lock();
            state.connected = true;
            state.port = Some("mock".to_string());
            state.echo_ack = true;
        }
        mock
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl MockHandle {
    /// 追加一条原始字节应答
    pub fn push_reply(&self, bytes: impl Into<Vec<u8>>) {
        self.state.lock().replies.push_back(MockReply::Bytes(bytes.into()));
    }

    /// 追加一条帧应答（无法编码的帧按空读取处理）
    pub fn push_frame(&self, command_id: u8, payload: impl Into<Vec<u8>>) {
        let frame = Frame::new(command_id, ControlFlags::immediate(), payload);
        let reply = match frame.to_bytes() {
            Ok(bytes) => MockReply::Bytes(bytes),
            Err(_) => MockReply::Silence,
        };
        self.state.lock().replies.push_back(reply);
    }

    /// 追加一次静默读取
    pub fn push_silence(&self) {
        self.state.lock().replies.push_back(MockReply::Silence);
    }

    /// 追加一次读取 IO 故障
    pub fn push_read_error(&self) {
        self.state.lock().replies.push_back(MockReply::ReadError);
    }

    /// 回显确认：没有脚本应答时，以相同指令 ID 回复
    pub fn set_echo_ack(&self, enabled: bool) {
        self.state.lock().echo_ack = enabled;
    }

    /// 回显模式下某指令 ID 的应答负载
    pub fn set_echo_payload(&self, command_id: u8, payload: impl Into<Vec<u8>>) {
        self.state.lock().echo_payloads.insert(command_id, payload.into());
    }

    /// 接下来 `count` 次发送失败
    pub fn fail_next_sends(&self, count: usize) {
        self.state.lock().fail_sends = count;
    }

    /// 连接是否失败
    pub fn set_connect_failure(&self, fail: bool) {
        self.state.lock().fail_connect = fail;
    }

    /// 每次读取前的模拟延迟
    pub fn set_read_delay(&self, delay: Duration) {
        self.state.lock().read_delay = delay;
    }

    /// 模拟链路掉线（不记录 Disconnect 事件）
    pub fn drop_link(&self) {
        self.state.lock().connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    pub fn port(&self) -> Option<String> {
        self.state.lock().port.clone()
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// 已发送的全部帧
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                MockEvent::Send(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn send_count(&self) -> usize {
        self.count(|e| matches!(e, MockEvent::Send(_)))
    }

    pub fn read_count(&self) -> usize {
        self.count(|e| matches!(e, MockEvent::Read(_)))
    }

    fn count(&self, pred: impl Fn(&MockEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|e| pred(e)).count()
    }
}

impl MockState {
    fn echo_reply(&self) -> Vec<u8> {
        let Some(sent) = self.last_sent.as_deref() else {
            return Vec::new();
        };
        let Ok(request) = Frame::parse(sent) else {
            return Vec::new();
        };
        let payload = self
            .echo_payloads
            .get(&request.command_id)
            .cloned()
            .unwrap_or_default();
        Frame::new(request.command_id, request.control, payload)
            .to_bytes()
            .unwrap_or_default()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, port: &str, _timeout: Duration) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.fail_connect {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock port {} unavailable", port),
            )));
        }
        state.connected = true;
        state.port = Some(port.to_string());
        state.events.push(MockEvent::Connect {
            port: port.to_string(),
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.state.lock();
        if state.connected {
            state.connected = false;
            state.events.push(MockEvent::Disconnect);
        }
    }

    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        state.events.push(MockEvent::Send(bytes.to_vec()));
        if state.fail_sends > 0 {
            state.fail_sends -= 1;
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock send failure",
            )));
        }
        state.last_sent = Some(bytes.to_vec());
        trace!("MockTransport: sent {} bytes", bytes.len());
        Ok(())
    }

    fn read(&mut self, _timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let delay = self.state.lock().read_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let mut state = self.state.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }

        let data = match state.replies.pop_front() {
            Some(MockReply::Bytes(bytes)) => bytes,
            Some(MockReply::Silence) => Vec::new(),
            Some(MockReply::ReadError) => {
                state.events.push(MockEvent::Read(Vec::new()));
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "mock read failure",
                )));
            },
            None if state.echo_ack => state.echo_reply(),
            None => Vec::new(),
        };
        state.events.push(MockEvent::Read(data.clone()));
        Ok(data)
    }
}
