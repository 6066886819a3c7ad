//! Fake Push Sender - 用于测试的推送发送器
//!
//! 不访问网络，只记录收到的消息，并按配置返回成功或失败

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{PushError, PushSenderPort};
use crate::domain::push::{Payload, SendOptions, Subscription};

/// 一次已记录的发送
#[derive(Debug, Clone)]
pub struct SentPush {
    pub subscription: Subscription,
    pub payload: Option<Vec<u8>>,
    pub options: SendOptions,
}

type FailureFactory = Box<dyn Fn() -> PushError + Send + Sync>;

/// Fake Push Sender
pub struct FakePushSender {
    sent: Mutex<Vec<SentPush>>,
    failure: Option<FailureFactory>,
}

impl FakePushSender {
    /// 始终成功
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// 始终以 `make_error` 产生的错误失败
    pub fn failing(make_error: impl Fn() -> PushError + Send + Sync + 'static) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(Box::new(make_error)),
        }
    }

    /// 已记录的发送（包括失败的）
    pub fn sent(&self) -> Vec<SentPush> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Default for FakePushSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushSenderPort for FakePushSender {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: Option<&Payload>,
        options: SendOptions,
    ) -> Result<(), PushError> {
        tracing::debug!(
            endpoint = ?subscription.endpoint(),
            ttl = options.ttl.as_secs(),
            "FakePushSender: recording push"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentPush {
                subscription: subscription.clone(),
                payload: payload.map(|p| p.as_bytes().to_vec()),
                options,
            });
        }

        match &self.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }
}
