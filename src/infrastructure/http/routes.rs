//! HTTP Routes
//!
//! API Endpoints:
//! - /vapidPublicKey    GET   VAPID 公钥（纯文本）
//! - /register          POST  接收订阅（不保存）
//! - /sendNotification  POST  延迟后发送推送
//! - /ping              GET   健康检查
//! - 其他路径                  静态文件

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(static_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route("/vapidPublicKey", get(handlers::vapid_public_key))
        .route("/register", post(handlers::register))
        .route("/sendNotification", post(handlers::send_notification))
        .route("/ping", get(handlers::ping))
        .fallback_service(ServeDir::new(static_dir))
}
