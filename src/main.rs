//! Push Relay - Web Push 通知演示服务
//!
//! 启动流程: 配置 → 日志 → VAPID 校验 → 推送发送器 → HTTP 服务器

use std::sync::Arc;

use push_relay::application::PushSenderPort;
use push_relay::config::{load_config, print_config, ConfigError};
use push_relay::domain::push::VapidKeys;
use push_relay::infrastructure::adapters::{WebPushSender, WebPushSenderConfig};
use push_relay::infrastructure::http::{AppState, HttpServer, HttpServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},push_relay={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Push Relay - Web Push 通知演示服务");
    print_config(&config);

    // 校验 VAPID 身份；缺少密钥时给出一对可直接使用的示例密钥
    let vapid = match config.vapid.details() {
        Ok(vapid) => vapid,
        Err(ConfigError::MissingVapidKeys) => {
            let example = VapidKeys::generate();
            tracing::error!(
                "You must set the VAPID_PUBLIC_KEY and VAPID_PRIVATE_KEY environment variables. \
                 You can use the following ones:"
            );
            tracing::error!("VAPID_PUBLIC_KEY={}", example.public_key());
            tracing::error!("VAPID_PRIVATE_KEY={}", example.private_key());
            anyhow::bail!(ConfigError::MissingVapidKeys);
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid VAPID configuration");
            anyhow::bail!(e);
        }
    };

    let public_key = vapid.keys.public_key().to_string();

    // 创建推送发送器
    let sender_config = WebPushSenderConfig::default().with_timeout(config.push.timeout_secs);
    let push_sender: Arc<dyn PushSenderPort> = Arc::new(WebPushSender::new(vapid, sender_config)?);

    // 创建 HTTP 服务器
    let server_config = HttpServerConfig::new(&config.server.host, config.server.port)
        .withstatic_dir(config.server.static_dir.clone());
    let state = AppState::new(public_key, push_sender);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server on {}", config.server.local_url());

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
