//! 执行器指标
//!
//! 原子计数器，任何线程都可以无锁读取。

use crate::error::CommunicationError;
use std::sync::atomic::{AtomicU64, Ordering};

/// 执行器实时指标
///
/// # 使用示例
///
/// ```rust
/// use dobot_driver::ExecutorMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = ExecutorMetrics::new();
/// metrics.commands_total.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.commands_total, 1);
/// ```
#[derive(Debug, Default)]
pub struct ExecutorMetrics {
    /// 提交的指令总数
    pub commands_total: AtomicU64,
    /// 成功完成的指令数
    pub commands_ok: AtomicU64,
    /// 链路未打开被拒绝的次数
    pub not_connected: AtomicU64,
    /// 发送失败次数
    pub send_failures: AtomicU64,
    /// 应答超时次数
    pub no_response: AtomicU64,
    /// 帧结构错误次数
    pub invalid_framing: AtomicU64,
    /// 负载解析失败次数
    pub parse_failures: AtomicU64,
    /// 发送字节数
    pub bytes_sent: AtomicU64,
    /// 接收字节数
    pub bytes_received: AtomicU64,
}

impl ExecutorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_error(&self, error: &CommunicationError) {
        let counter = match error {
            CommunicationError::NotConnected => &self.not_connected,
            CommunicationError::SendFailure(_) => &self.send_failures,
            CommunicationError::NoResponse => &self.no_response,
            CommunicationError::InvalidFraming(_) => &self.invalid_framing,
            CommunicationError::ParseFailure(_) => &self.parse_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_total: self.commands_total.load(Ordering::Relaxed),
            commands_ok: self.commands_ok.load(Ordering::Relaxed),
            not_connected: self.not_connected.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            no_response: self.no_response.load(Ordering::Relaxed),
            invalid_framing: self.invalid_framing.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.commands_total.store(0, Ordering::Relaxed);
        self.commands_ok.store(0, Ordering::Relaxed);
        self.not_connected.store(0, Ordering::Relaxed);
        self.send_failures.store(0, Ordering::Relaxed);
        self.no_response.store(0, Ordering::Relaxed);
        self.invalid_framing.store(0, Ordering::Relaxed);
        self.parse_failures.store(0, Ordering::Relaxed);
        self.bytes_sent.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub commands_total: u64,
    pub commands_ok: u64,
    pub not_connected: u64,
    pub send_failures: u64,
    pub no_response: u64,
    pub invalid_framing: u64,
    pub parse_failures: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl MetricsSnapshot {
    /// 失败总数
    pub fn failures(&self) -> u64 {
        self.not_connected + self.send_failures + self.no_response + self.invalid_framing + self.parse_failures
    }

    /// 成功率（百分比）
    ///
    /// 返回 0.0 到 100.0 之间的值。如果 `commands_total` 为 0，返回 0.0。
    pub fn success_rate(&self) -> f64 {
        if self.commands_total == 0 {
            return 0.0;
        }
        (self.commands_ok as f64 / self.commands_total as f64) * 100.0
    }
}
