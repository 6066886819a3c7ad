//! Web Push Sender - 通过 Web Push 协议投递通知
//!
//! 实现 PushSenderPort trait：
//! - `web-push` crate 负责 VAPID JWT 签名 (RFC 8292) 和载荷加密 (RFC 8291, aes128gcm)
//! - `reqwest` 负责把消息 POST 到订阅的 endpoint (RFC 8030)

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use reqwest::Client;
use std::time::Duration;
use web_push::{
    ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessage,
    WebPushMessageBuilder,
};

use crate::application::ports::{PushError, PushSenderPort};
use crate::domain::push::{Payload, SendOptions, Subscription, VapidDetails};

/// Web Push 发送器配置
#[derive(Debug, Clone, Default)]
pub struct WebPushSenderConfig {
    /// 推送服务请求超时（秒），0 表示不设超时
    pub timeout_secs: u64,
}

impl WebPushSenderConfig {
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 已签名（可能已加密）的消息
struct PreparedPush {
    message: WebPushMessage,
    /// `vapid t=..., k=...`；无载荷时 web-push 不生成认证头，由这里补上
    authorization: String,
}

/// Web Push 发送器
///
/// 启动时用 (subject, public key, private key) 构造一次，之后通过 `AppState` 共享。
pub struct WebPushSender {
    client: Client,
    vapid: VapidDetails,
}

impl WebPushSender {
    /// 创建发送器
    pub fn new(vapid: VapidDetails, config: WebPushSenderConfig) -> Result<Self, PushError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| PushError::NetworkError(e.to_string()))?;

        tracing::info!(
            subject = %vapid.subject,
            public_key = %vapid.keys.public_key(),
            timeout_secs = config.timeout_secs,
            "WebPushSender initialized"
        );

        Ok(Self { client, vapid })
    }

    /// 签名并加密，生成待发送的消息
    fn build_message(
        &self,
        subscription: &Subscription,
        payload: Option<&Payload>,
        options: SendOptions,
    ) -> Result<PreparedPush, PushError> {
        let sub_info: SubscriptionInfo = serde_json::from_value(subscription.as_value().clone())
            .map_err(|e| PushError::InvalidSubscription(e.to_string()))?;

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(self.vapid.keys.private_key(), &sub_info)
                .map_err(|e| PushError::MessageBuild(format!("VAPID key: {}", e)))?;
        sig_builder.add_claim("sub", self.vapid.subject.as_str());
        let signature = sig_builder
            .build()
            .map_err(|e| PushError::MessageBuild(format!("VAPID signature: {}", e)))?;
        let authorization = format!(
            "vapid t={}, k={}",
            signature.auth_t,
            BASE64URL.encode(&signature.auth_k)
        );

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        if let Some(payload) = payload {
            builder.set_payload(ContentEncoding::Aes128Gcm, payload.as_bytes());
        }
        builder.set_vapid_signature(signature);
        builder.set_ttl(options.ttl.as_secs());

        let message = builder
            .build()
            .map_err(|e| PushError::MessageBuild(e.to_string()))?;

        Ok(PreparedPush {
            message,
            authorization,
        })
    }
}

#[async_trait]
impl PushSenderPort for WebPushSender {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: Option<&Payload>,
        options: SendOptions,
    ) -> Result<(), PushError> {
        let PreparedPush {
            message,
            authorization,
        } = self.build_message(subscription, payload, options)?;
        let endpoint = message.endpoint.to_string();

        let mut request = self
            .client
            .post(&endpoint)
            .header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        match message.payload {
            Some(push_payload) => {
                request = request
                    .header("Content-Encoding", push_payload.content_encoding.to_str())
                    .header("Content-Type", "application/octet-stream");

                for (key, value) in &push_payload.crypto_headers {
                    request = request.header(*key, value.as_str());
                }

                request = request.body(push_payload.content);
            }
            None => {
                request = request
                    .header("Authorization", authorization)
                    .header("Content-Length", "0");
            }
        }

        tracing::debug!(endpoint = %endpoint, ttl = message.ttl, "Sending web push");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PushError::Timeout
            } else if e.is_connect() {
                PushError::NetworkError(format!("Cannot connect to push service: {}", e))
            } else {
                PushError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(endpoint = %endpoint, status = status.as_u16(), "Web push delivered");
            return Ok(());
        }

        match status.as_u16() {
            404 | 410 => Err(PushError::SubscriptionExpired {
                status: status.as_u16(),
            }),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(PushError::Rejected { status: code, body })
            }
        }
    }
}
