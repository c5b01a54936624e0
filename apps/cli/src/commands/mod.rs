//! 命令定义和实现

pub mod config;
pub mod device;
pub mod ports;

pub use device::{
    DefaultHomeArgs, LiftArgs, MotionArgs, MoveArgs, NameAction, QueueAction, Session,
    VacuumState,
};
