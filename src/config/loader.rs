//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 约定的环境变量（`VAPID_PUBLIC_KEY`、`VAPID_PRIVATE_KEY`、`VAPID_SUBJECT`、`PORT`）
//! 2. 前缀环境变量（`PUSH_RELAY_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::push::VapidError;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("VAPID_PUBLIC_KEY and VAPID_PRIVATE_KEY must be set")]
    MissingVapidKeys,

    #[error("VAPID_SUBJECT must be set")]
    MissingVapidSubject,

    #[error("Invalid VAPID configuration: {0}")]
    InvalidVapid(#[from] VapidError),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径（相对工作目录，扩展名由 `config` 推断）
pub const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 约定的环境变量
///
/// 这些名字没有前缀，是浏览器推送示例通用的写法。
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub vapid_public_key: Option<String>,
    pub vapid_private_key: Option<String>,
    pub vapid_subject: Option<String>,
    pub port: Option<String>,
}

impl EnvOverrides {
    /// 从进程环境读取
    pub fn from_env() -> Self {
        Self {
            vapid_public_key: std::env::var("VAPID_PUBLIC_KEY").ok(),
            vapid_private_key: std::env::var("VAPID_PRIVATE_KEY").ok(),
            vapid_subject: std::env::var("VAPID_SUBJECT").ok(),
            port: std::env::var("PORT").ok(),
        }
    }
}

/// 加载应用配置
///
/// # 环境变量示例
/// - `VAPID_PUBLIC_KEY=BPx...`
/// - `PORT=8080`
/// - `PUSH_RELAY_SERVER__STATIC_DIR=public`
/// - `PUSH_RELAY_PUSH__TIMEOUT_SECS=30`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build_config(config_path, EnvOverrides::from_env())
}

/// 合并所有来源并校验
pub fn build_config(
    config_path: Option<&Path>,
    overrides: EnvOverrides,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3003)?
        .set_default("server.static_dir", "./")?
        .set_default("push.timeout_secs", 0)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 前缀环境变量，例如 PUSH_RELAY_SERVER__HOST=127.0.0.1
    builder = builder.add_source(
        Environment::with_prefix("PUSH_RELAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 约定的环境变量（最高优先级）
    builder = builder
        .set_override_option("vapid.public_key", overrides.vapid_public_key)?
        .set_override_option("vapid.private_key", overrides.vapid_private_key)?
        .set_override_option("vapid.subject", overrides.vapid_subject)?;

    if let Some(port) = overrides.port.filter(|p| !p.trim().is_empty()) {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::ValidationError(format!("Invalid PORT: {:?}", port)))?;
        builder = builder.set_override("server.port", i64::from(port))?;
    }

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// VAPID 值在这里不校验：缺少密钥时启动流程需要先打印示例密钥，
/// 见 `VapidConfig::details`。
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.static_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Static directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    let state = |v: &Option<String>| if v.is_some() { "<set>" } else { "<missing>" };

    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Static Directory: {:?}", config.server.static_dir);
    tracing::info!(
        "VAPID Public Key: {}",
        config.vapid.public_key.as_deref().unwrap_or("<missing>")
    );
    tracing::info!("VAPID Private Key: {}", state(&config.vapid.private_key));
    tracing::info!(
        "VAPID Subject: {}",
        config.vapid.subject.as_deref().unwrap_or("<missing>")
    );
    if config.push.timeout_secs > 0 {
        tracing::info!("Push Timeout: {}s", config.push.timeout_secs);
    } else {
        tracing::info!("Push Timeout: none");
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_overrides() {
        let file = write_config("");
        let config = build_config(Some(file.path()), EnvOverrides::default()).unwrap();
        assert_eq!(config.server.port, 3003);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.vapid.public_key.is_none());
        assert!(config.vapid.subject.is_none());
    }

    #[test]
    fn test_file_values_are_loaded() {
        let file = write_config(
            r#"
            [server]
            port = 9000
            static_dir = "public"

            [push]
            timeout_secs = 15
            "#,
        );
        let config = build_config(Some(file.path()), EnvOverrides::default()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert_eq!(config.push.timeout_secs, 15);
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let file = write_config(
            r#"
            [server]
            port = 9000

            [vapid]
            subject = "mailto:file@example.com"
            "#,
        );
        let overrides = EnvOverrides {
            vapid_public_key: Some("pub".to_string()),
            vapid_private_key: Some("priv".to_string()),
            vapid_subject: Some("mailto:env@example.com".to_string()),
            port: Some("4000".to_string()),
        };
        let config = build_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.vapid.public_key.as_deref(), Some("pub"));
        assert_eq!(config.vapid.private_key.as_deref(), Some("priv"));
        assert_eq!(config.vapid.subject.as_deref(), Some("mailto:env@example.com"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let file = write_config("");
        let overrides = EnvOverrides {
            port: Some("http".to_string()),
            ..Default::default()
        };
        let err = build_config(Some(file.path()), overrides).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_static_dir() {
        let mut config = AppConfig::default();
        config.server.static_dir = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }
}
