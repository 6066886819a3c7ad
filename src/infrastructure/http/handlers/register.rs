//! Register Handler

use axum::{body::Bytes, http::StatusCode};

/// 接收订阅但不保存
///
/// 请求体不做解析，任何内容都返回 201。
pub async fn register(body: Bytes) -> StatusCode {
    tracing::debug!(body_len = body.len(), "Subscription received, not persisted");
    StatusCode::CREATED
}
