//! 设备命令
//!
//! 每个命令打开一次会话：连接并探活，执行单个操作，随后由 Drop 断开。

use crate::GlobalArgs;
use crate::validation::{CoordinateValidator, validate_non_negative};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use dobot_sdk::{DobotService, PtpMode, SerialTransport};

/// 名称子命令
#[derive(Subcommand, Debug, Clone)]
pub enum NameAction {
    /// 读取设备名称
    Get,
    /// 写入设备名称
    Set {
        /// 新名称（ASCII）
        name: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacuumState {
    On,
    Off,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    /// 开始执行队列
    Exec,
    /// 清空队列
    Clear,
    /// 停止执行队列
    Stop,
}

/// 点到点运动参数
#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    /// 运动模式（jump-xyz, movj-xyz, movl-xyz, ...）
    #[arg(short, long, default_value = "movl-xyz")]
    pub mode: PtpMode,

    #[arg(long, allow_hyphen_values = true)]
    pub x: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub y: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub z: f32,

    /// 末端旋转角（度）
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub r: f32,
}

/// 运动参数
#[derive(Args, Debug, Clone)]
pub struct MotionArgs {
    #[arg(long)]
    pub xyz_velocity: f32,

    #[arg(long)]
    pub r_velocity: f32,

    #[arg(long)]
    pub xyz_acceleration: f32,

    #[arg(long)]
    pub r_acceleration: f32,
}

/// 门型运动高度参数
#[derive(Args, Debug, Clone)]
pub struct LiftArgs {
    /// 抬升高度（mm）
    #[arg(long)]
    pub jump_height: f32,

    /// 最大高度（mm）
    #[arg(long)]
    pub max_height: f32,
}

/// 默认 Home 位置
#[derive(Args, Debug, Clone)]
pub struct DefaultHomeArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub x: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub y: f32,

    #[arg(long, allow_hyphen_values = true)]
    pub z: f32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub r: f32,
}

/// 已探活的设备会话
pub struct Session {
    service: DobotService<SerialTransport>,
}

impl Session {
    /// 解析配置、连接并探活
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = super::config::resolve(global)?;
        let port = config.port_name.clone();

        println!("🔌 连接到 {} ...", port);
        let service = DobotService::open(config);
        if !service.start() {
            anyhow::bail!("❌ 设备未响应: {}", port);
        }
        println!("✅ 已连接");

        Ok(Self { service })
    }

    /// 设备信息
    pub fn info(&self, json: bool) -> Result<()> {
        let serial_number = self.service.get_serial_number();
        let name = self.service.get_device_name();
        let profile = self.service.get_movement_config();
        let status = self.service.status();

        if json {
            let value = serde_json::json!({
                "serial_number": serial_number,
                "name": name,
                "movement_profile": profile,
                "status": status,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("📊 设备信息:");
        println!("  SN:   {}", serial_number.as_deref().unwrap_or("-"));
        println!("  Name: {}", name.as_deref().unwrap_or("-"));
        match profile {
            Some(p) => println!(
                "  PTP:  xyz_vel={:.1} r_vel={:.1} xyz_acc={:.1} r_acc={:.1}",
                p.xyz_velocity, p.r_velocity, p.xyz_acceleration, p.r_acceleration
            ),
            None => println!("  PTP:  -"),
        }
        println!();
        print!("{}", status);

        Ok(())
    }

    pub fn name(&self, action: NameAction) -> Result<()> {
        match action {
            NameAction::Get => {
                let Some(name) = self.service.get_device_name() else {
                    anyhow::bail!("❌ 读取设备名称失败");
                };
                println!("{}", name);
                Ok(())
            },
            NameAction::Set { name } => {
                if !name.is_ascii() {
                    anyhow::bail!("❌ 设备名称必须是 ASCII: {:?}", name);
                }
                check(self.service.set_device_name(&name), "设置设备名称")
            },
        }
    }

    pub fn move_to(&self, args: MoveArgs) -> Result<()> {
        CoordinateValidator::default_range().validate_pose(args.x, args.y, args.z, args.r)?;

        println!(
            "⏳ {} → ({:.2}, {:.2}, {:.2}, {:.2})",
            args.mode, args.x, args.y, args.z, args.r
        );
        check(
            self.service.move_to_position(args.mode, args.x, args.y, args.z, args.r),
            "点到点运动",
        )?;
        self.queue_hint();
        Ok(())
    }

    pub fn home(&self) -> Result<()> {
        check(self.service.go_home(), "回零")?;
        self.queue_hint();
        Ok(())
    }

    pub fn vacuum(&self, state: VacuumState) -> Result<()> {
        check(
            self.service.set_vacuum_state(state == VacuumState::On),
            "吸盘控制",
        )?;
        self.queue_hint();
        Ok(())
    }

    pub fn queue(&self, action: QueueAction) -> Result<()> {
        match action {
            QueueAction::Exec => check(self.service.execute_queue(), "开始执行队列"),
            QueueAction::Clear => check(self.service.clear_queue(), "清空队列"),
            QueueAction::Stop => check(self.service.stop_queue(), "停止队列"),
        }
    }

    pub fn motion(&self, args: MotionArgs) -> Result<()> {
        validate_non_negative("xyz-velocity", args.xyz_velocity)?;
        validate_non_negative("r-velocity", args.r_velocity)?;
        validate_non_negative("xyz-acceleration", args.xyz_acceleration)?;
        validate_non_negative("r-acceleration", args.r_acceleration)?;

        check(
            self.service.set_movement_config(
                args.xyz_velocity,
                args.r_velocity,
                args.xyz_acceleration,
                args.r_acceleration,
            ),
            "设置运动参数",
        )
    }

    pub fn lift(&self, args: LiftArgs) -> Result<()> {
        validate_non_negative("jump-height", args.jump_height)?;
        validate_non_negative("max-height", args.max_height)?;

        check(
            self.service.set_lift_height(args.jump_height, args.max_height),
            "设置抬升高度",
        )
    }

    pub fn default_home(&self, args: DefaultHomeArgs) -> Result<()> {
        CoordinateValidator::default_range().validate_pose(args.x, args.y, args.z, args.r)?;

        check(
            self.service.set_default_home(args.x, args.y, args.z, args.r),
            "设置默认 Home 位置",
        )
    }

    fn queue_hint(&self) {
        if self.service.config().queue_commands {
            println!("💡 指令已进入设备队列，使用 `queue exec` 开始执行");
        }
    }
}

fn check(ok: bool, action: &str) -> Result<()> {
    if !ok {
        anyhow::bail!("❌ {}失败", action);
    }
    println!("✅ {}完成", action);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct MoveHarness {
        #[command(flatten)]
        args: MoveArgs,
    }

    #[test]
    fn test_move_args_default_mode() {
        let parsed = MoveHarness::try_parse_from(["move", "--x", "200", "--y", "0", "--z", "50"])
            .unwrap();
        assert_eq!(parsed.args.mode, PtpMode::MovlXyz);
        assert_eq!(parsed.args.r, 0.0);
    }

    #[test]
    fn test_move_args_negative_and_mode() {
        let parsed = MoveHarness::try_parse_from([
            "move", "--mode", "jump-xyz", "--x", "-120.5", "--y", "30", "--z", "-10", "--r", "-45",
        ])
        .unwrap();
        assert_eq!(parsed.args.mode, PtpMode::JumpXyz);
        assert_eq!(parsed.args.x, -120.5);
        assert_eq!(parsed.args.z, -10.0);
        assert_eq!(parsed.args.r, -45.0);
    }

    #[test]
    fn test_move_args_rejects_unknown_mode() {
        let result =
            MoveHarness::try_parse_from(["move", "--mode", "teleport", "--x", "0", "--y", "0", "--z", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check() {
        assert!(check(true, "test").is_ok());
        assert!(check(false, "test").is_err());
    }
}
