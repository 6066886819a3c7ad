//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

use crate::application::ports::PushError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 推送服务错误
    #[error("Push delivery failed: {0}")]
    PushDeliveryError(#[from] PushError),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}
