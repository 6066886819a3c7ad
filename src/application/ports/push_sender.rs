//! Push Sender Port - 推送发送抽象
//!
//! VAPID 签名、载荷加密以及到推送服务的传输全部委托给实现方，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::push::{Payload, SendOptions, Subscription};

/// 推送错误
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),

    #[error("Failed to build push message: {0}")]
    MessageBuild(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Subscription expired or unsubscribed (HTTP {status})")]
    SubscriptionExpired { status: u16 },

    #[error("Push service rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Push Sender Port
///
/// 外部推送服务的抽象接口
#[async_trait]
pub trait PushSenderPort: Send + Sync {
    /// 发送一条推送消息
    ///
    /// `payload` 为 `None` 时发送无载荷的推送
    async fn send(
        &self,
        subscription: &Subscription,
        payload: Option<&Payload>,
        options: SendOptions,
    ) -> Result<(), PushError>;
}
