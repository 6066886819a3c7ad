//! Data Transfer Objects

use serde::Deserialize;

use crate::application::SendNotificationCommand;
use crate::domain::push::{Delay, Payload, SendOptions, Subscription, Ttl};

// ============================================================================
// 数值字段
// ============================================================================

/// 数字或数字字符串
///
/// 浏览器表单直接提交 `<input>` 的值，`ttl` / `delay` 常以字符串到达。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    /// 空字符串视为未提供
    pub fn to_f64(&self, field: &str) -> Result<Option<f64>, String> {
        match self {
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("{} must be a number, got {:?}", field, s)),
        }
    }
}

// ============================================================================
// Send Notification
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub ttl: Option<NumberOrString>,
    #[serde(default)]
    pub delay: Option<NumberOrString>,
}

impl SendNotificationRequest {
    /// 从原始请求体解析
    ///
    /// 不是 JSON 对象的请求体（包括缺少 Content-Type、空请求体）按 `{}` 处理，
    /// 之后发送会因缺少订阅而失败。只有字段类型错误才返回 Err。
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        let fields = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };

        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| format!("Invalid request field: {}", e))
    }

    /// 转换为命令；只在数值字段无法解析时失败
    pub fn into_command(self) -> Result<SendNotificationCommand, String> {
        let ttl = match self.ttl.as_ref().map(|t| t.to_f64("ttl")).transpose()?.flatten() {
            Some(secs) if !secs.is_finite() || secs < 0.0 => {
                return Err(format!("ttl must be a non-negative number, got {}", secs));
            }
            Some(secs) => Ttl::from_secs(secs.min(u32::MAX as f64) as u32),
            None => Ttl::default(),
        };

        let delay = self
            .delay
            .as_ref()
            .map(|d| d.to_f64("delay"))
            .transpose()?
            .flatten()
            .map(Delay::from_secs_f64)
            .unwrap_or_default();

        let payload = match self.payload {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Payload::from_text(Some(text)),
            Some(other) => Payload::from_text(Some(other.to_string())),
        };

        Ok(SendNotificationCommand {
            subscription: self.subscription,
            payload,
            options: SendOptions::new(ttl),
            delay,
        })
    }
}
