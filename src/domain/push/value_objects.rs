//! Push Context - Value Objects

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 推送订阅
///
/// 浏览器生成的 endpoint + keys 描述。中继不检查其结构，原样交给推送端口，
/// 由推送适配器负责解析。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subscription(serde_json::Value);

impl Subscription {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// 仅用于日志
    pub fn endpoint(&self) -> Option<&str> {
        self.0.get("endpoint").and_then(|v| v.as_str())
    }
}

/// 通知载荷 - 原样转发的字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// 空文本视为没有载荷
    pub fn from_text(text: Option<String>) -> Option<Self> {
        text.filter(|t| !t.is_empty()).map(Self::new)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 推送服务保留未送达消息的时间（秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ttl(u32);

impl Ttl {
    /// 四周，未指定时使用
    pub const DEFAULT_SECS: u32 = 2_419_200;

    pub fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u32 {
        self.0
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

/// 发送前的等待时间
///
/// 不变量: 非有限值、非正值以及超过定时器上限 (2^31 - 1 毫秒) 的值一律视为零。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delay(Duration);

impl Delay {
    const MAX_MILLIS: f64 = 2_147_483_647.0;

    pub fn from_secs_f64(secs: f64) -> Self {
        let millis = secs * 1000.0;
        if !millis.is_finite() || millis <= 0.0 || millis > Self::MAX_MILLIS {
            return Self(Duration::ZERO);
        }
        Self(Duration::from_secs_f64(secs))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// 发送选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SendOptions {
    #[serde(rename = "TTL")]
    pub ttl: Ttl,
}

impl SendOptions {
    pub fn new(ttl: Ttl) -> Self {
        Self { ttl }
    }
}
