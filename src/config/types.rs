//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use super::loader::ConfigError;
use crate::domain::push::{VapidDetails, VapidKeys, VapidSubject};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// VAPID 身份配置
    #[serde(default)]
    pub vapid: VapidConfig,

    /// 推送服务配置
    #[serde(default)]
    pub push: PushConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 未匹配路由时托管的静态文件目录
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3003
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 本机访问地址（用于启动日志）
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// VAPID 配置
///
/// 三个值都来自环境变量 `VAPID_PUBLIC_KEY` / `VAPID_PRIVATE_KEY` / `VAPID_SUBJECT`，
/// 缺少任何一个都无法启动。
#[derive(Clone, Default, Deserialize)]
pub struct VapidConfig {
    #[serde(default)]
    pub public_key: Option<String>,

    #[serde(default)]
    pub private_key: Option<String>,

    /// 联系人 URI（mailto: 或 https:）
    #[serde(default)]
    pub subject: Option<String>,
}

impl VapidConfig {
    /// 校验并构造发送方身份
    pub fn details(&self) -> Result<VapidDetails, ConfigError> {
        let (public_key, private_key) =
            match (present(&self.public_key), present(&self.private_key)) {
                (Some(public_key), Some(private_key)) => (public_key, private_key),
                _ => return Err(ConfigError::MissingVapidKeys),
            };
        let subject = present(&self.subject).ok_or(ConfigError::MissingVapidSubject)?;

        let keys = VapidKeys::from_base64url(public_key, private_key)?;
        let subject = VapidSubject::parse(subject)?;
        Ok(VapidDetails::new(subject, keys))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl std::fmt::Debug for VapidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("subject", &self.subject)
            .finish()
    }
}

/// 推送服务配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushConfig {
    /// 推送服务请求超时（秒），0 表示不设超时
    #[serde(default)]
    pub timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
