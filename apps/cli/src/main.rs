//! # Dobot CLI
//!
//! Command-line interface for Dobot robot arm control.
//!
//! 每条命令都是一次完整的会话：连接 → 探活 → 执行 → 断开。
//!
//! ```bash
//! # 列出串口
//! dobot-cli ports
//!
//! # 查询设备信息
//! dobot-cli --port /dev/ttyUSB0 info
//!
//! # 队列模式下移动并执行队列
//! dobot-cli --port /dev/ttyUSB0 move --mode movl-xyz --x 200 --y 0 --z 50
//! dobot-cli --port /dev/ttyUSB0 queue exec
//! ```
//!
//! 串口等参数也可以写在 `<config_dir>/dobot/config.toml` 中，`--port` 优先。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod validation;

use commands::{
    DefaultHomeArgs, LiftArgs, MotionArgs, MoveArgs, NameAction, QueueAction, VacuumState,
};

/// Dobot CLI - 机械臂命令行工具
#[derive(Parser, Debug)]
#[command(name = "dobot-cli")]
#[command(about = "Command-line interface for Dobot robot arm control", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// 全局参数
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// 串口名（覆盖配置文件）
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// 配置文件路径（默认 <config_dir>/dobot/config.toml）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 指令立即执行，不进入设备队列
    #[arg(long, global = true)]
    pub no_queue: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出可用串口
    Ports,

    /// 查询设备信息（序列号、名称、运动参数、状态）
    Info {
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 查询或设置设备名称
    Name {
        #[command(subcommand)]
        action: Option<NameAction>,
    },

    /// 点到点运动
    Move {
        #[command(flatten)]
        args: MoveArgs,
    },

    /// 回零
    Home,

    /// 吸盘开关
    Vacuum {
        #[arg(value_enum)]
        state: VacuumState,
    },

    /// 板载指令队列控制
    Queue {
        #[arg(value_enum)]
        action: QueueAction,
    },

    /// 设置运动速度/加速度
    Motion {
        #[command(flatten)]
        args: MotionArgs,
    },

    /// 设置门型运动抬升高度
    Lift {
        #[command(flatten)]
        args: LiftArgs,
    },

    /// 设置默认 Home 位置
    DefaultHome {
        #[command(flatten)]
        args: DefaultHomeArgs,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("dobot_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ports => commands::ports::list(),

        Commands::Info { json } => {
            let session = commands::Session::open(&cli.global)?;
            session.info(json)
        },

        Commands::Name { action } => {
            let session = commands::Session::open(&cli.global)?;
            session.name(action.unwrap_or(NameAction::Get))
        },

        Commands::Move { args } => commands::Session::open(&cli.global)?.move_to(args),

        Commands::Home => commands::Session::open(&cli.global)?.home(),

        Commands::Vacuum { state } => commands::Session::open(&cli.global)?.vacuum(state),

        Commands::Queue { action } => commands::Session::open(&cli.global)?.queue(action),

        Commands::Motion { args } => commands::Session::open(&cli.global)?.motion(args),

        Commands::Lift { args } => commands::Session::open(&cli.global)?.lift(args),

        Commands::DefaultHome { args } => commands::Session::open(&cli.global)?.default_home(args),
    }
}
