//! 应用层 - 命令
//!
//! 中继只有写侧操作：把通知交给推送服务

mod notification_commands;

pub mod handlers;

pub use notification_commands::*;
