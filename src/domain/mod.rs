//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Push Context: 推送身份与通知参数

pub mod push;
