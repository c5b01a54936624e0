//! 指令目录
//!
//! 每个机器人操作对应一个 [`DobotCommand`] 变体。编码（参数 → 负载）与解码（负载 → 结果）
//! 都是对封闭枚举的穷尽匹配，新增指令时编译器会指出所有需要补充的分支。
//!
//! 负载约定：
//! - 支持队列的指令在控制字节 bit 0 与负载末尾 1 字节中同时携带队列标志
//! - 查询与设置共用指令 ID 时（设备名称、运动参数），查询的负载为空

use crate::types::{LiftHeight, MovementProfile, Position};
use dobot_protocol::{CommandId, ControlFlags, PayloadWriter, ProtocolError, PtpMode, decode_ascii};

/// 指令方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Get,
    Set,
}

/// 机器人指令
#[derive(Debug, Clone, PartialEq)]
pub enum DobotCommand {
    /// 查询设备序列号
    GetDeviceSerialNumber,
    /// 查询设备名称
    GetDeviceName,
    /// 设置设备名称（ASCII）
    SetDeviceName { name: String },
    /// 点到点运动
    MoveToPosition {
        mode: PtpMode,
        position: Position,
        queued: bool,
    },
    /// 回零
    GoHome { queued: bool },
    /// 吸盘开关
    SetVacuumState { enabled: bool, queued: bool },
    /// 开始执行板载指令队列
    ExecuteQueue,
    /// 清空板载指令队列
    ClearQueue,
    /// 停止执行板载指令队列
    StopQueue,
    /// 设置运动速度/加速度
    SetMovementProfile {
        profile: MovementProfile,
        queued: bool,
    },
    /// 查询运动速度/加速度
    GetMovementProfile,
    /// 设置门型运动抬升高度
    SetLiftHeight { params: LiftHeight, queued: bool },
    /// 设置默认 Home 位置
    SetDefaultHome { position: Position, queued: bool },
}

/// 指令执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    /// 设备已确认
    Ack,
    /// 字符串结果（序列号、设备名称）
    Text(String),
    /// 运动参数
    MovementProfile(MovementProfile),
}

impl CommandResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            CommandResponse::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_movement_profile(self) -> Option<MovementProfile> {
        match self {
            CommandResponse::MovementProfile(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, CommandResponse::Ack)
    }
}

impl DobotCommand {
    /// 线上指令 ID
    pub fn command_id(&self) -> CommandId {
        match self {
            DobotCommand::GetDeviceSerialNumber => CommandId::DeviceSerialNumber,
            DobotCommand::GetDeviceName | DobotCommand::SetDeviceName { .. } => CommandId::DeviceName,
            DobotCommand::MoveToPosition { .. } => CommandId::PtpCommand,
            DobotCommand::GoHome { .. } => CommandId::HomeCommand,
            DobotCommand::SetVacuumState { .. } => CommandId::SuctionCup,
            DobotCommand::ExecuteQueue => CommandId::QueuedCmdStartExec,
            DobotCommand::ClearQueue => CommandId::QueuedCmdClear,
            DobotCommand::StopQueue => CommandId::QueuedCmdStopExec,
            DobotCommand::SetMovementProfile { .. } | DobotCommand::GetMovementProfile => {
                CommandId::PtpCoordinateParams
            },
            DobotCommand::SetLiftHeight { .. } => CommandId::PtpJumpParams,
            DobotCommand::SetDefaultHome { .. } => CommandId::HomeParams,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            DobotCommand::GetDeviceSerialNumber
            | DobotCommand::GetDeviceName
            | DobotCommand::GetMovementProfile => Direction::Get,
            _ => Direction::Set,
        }
    }

    /// 队列标志（不支持队列的指令恒为 `false`）
    pub fn queued(&self) -> bool {
        match self {
            DobotCommand::MoveToPosition { queued, .. }
            | DobotCommand::GoHome { queued }
            | DobotCommand::SetVacuumState { queued, .. }
            | DobotCommand::SetMovementProfile { queued, .. }
            | DobotCommand::SetLiftHeight { queued, .. }
            | DobotCommand::SetDefaultHome { queued, .. } => *queued,
            DobotCommand::GetDeviceSerialNumber
            | DobotCommand::GetDeviceName
            | DobotCommand::SetDeviceName { .. }
            | DobotCommand::ExecuteQueue
            | DobotCommand::ClearQueue
            | DobotCommand::StopQueue
            | DobotCommand::GetMovementProfile => false,
        }
    }

    /// 控制字节
    pub fn control(&self) -> ControlFlags {
        ControlFlags::with_queued(self.queued())
    }

    /// 编码参数负载
    pub fn encode_payload(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut w = PayloadWriter::with_capacity(18);
        match self {
            DobotCommand::GetDeviceSerialNumber
            | DobotCommand::GetDeviceName
            | DobotCommand::ExecuteQueue
            | DobotCommand::ClearQueue
            | DobotCommand::StopQueue
            | DobotCommand::GetMovementProfile => {},
            DobotCommand::SetDeviceName { name } => {
                w.put_ascii(name)?;
            },
            DobotCommand::MoveToPosition {
                mode,
                position,
                queued,
            } => {
                w.put_u8(mode.as_u8());
                position.write(&mut w);
                w.put_bool(*queued);
            },
            DobotCommand::GoHome { queued } => {
                w.put_bool(*queued);
            },
            DobotCommand::SetVacuumState { enabled, queued } => {
                w.put_bool(*enabled).put_bool(*queued);
            },
            DobotCommand::SetMovementProfile { profile, queued } => {
                profile.write(&mut w);
                w.put_bool(*queued);
            },
            DobotCommand::SetLiftHeight { params, queued } => {
                params.write(&mut w);
                w.put_bool(*queued);
            },
            DobotCommand::SetDefaultHome { position, queued } => {
                position.write(&mut w);
                w.put_bool(*queued);
            },
        }
        Ok(w.finish())
    }

    /// 解析应答负载
    ///
    /// 设置类指令只要收到通过校验的应答即视为成功，负载内容不做解释。
    pub fn decode_response(&self, payload: &[u8]) -> Result<CommandResponse, ProtocolError> {
        match self {
            DobotCommand::GetDeviceSerialNumber | DobotCommand::GetDeviceName => {
                decode_ascii(payload).map(CommandResponse::Text)
            },
            DobotCommand::GetMovementProfile => {
                MovementProfile::decode(payload).map(CommandResponse::MovementProfile)
            },
            DobotCommand::SetDeviceName { .. }
            | DobotCommand::MoveToPosition { .. }
            | DobotCommand::GoHome { .. }
            | DobotCommand::SetVacuumState { .. }
            | DobotCommand::ExecuteQueue
            | DobotCommand::ClearQueue
            | DobotCommand::StopQueue
            | DobotCommand::SetMovementProfile { .. }
            | DobotCommand::SetLiftHeight { .. }
            | DobotCommand::SetDefaultHome { .. } => Ok(CommandResponse::Ack),
        }
    }

    /// 用于日志的名称
    pub fn name(&self) -> &'static str {
        match self {
            DobotCommand::GetDeviceSerialNumber => "GetDeviceSerialNumber",
            DobotCommand::GetDeviceName => "GetDeviceName",
            DobotCommand::SetDeviceName { .. } => "SetDeviceName",
            DobotCommand::MoveToPosition { .. } => "MoveToPosition",
            DobotCommand::GoHome { .. } => "GoHome",
            DobotCommand::SetVacuumState { .. } => "SetVacuumState",
            DobotCommand::ExecuteQueue => "ExecuteQueue",
            DobotCommand::ClearQueue => "ClearQueue",
            DobotCommand::StopQueue => "StopQueue",
            DobotCommand::SetMovementProfile { .. } => "SetMovementProfile",
            DobotCommand::GetMovementProfile => "GetMovementProfile",
            DobotCommand::SetLiftHeight { .. } => "SetLiftHeight",
            DobotCommand::SetDefaultHome { .. } => "SetDefaultHome",
        }
    }
}
