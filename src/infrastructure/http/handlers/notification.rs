//! Notification Handlers

use axum::{body::Bytes, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::infrastructure::http::dto::SendNotificationRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 延迟 `delay` 秒后把通知交给推送服务
///
/// 请求体不要求 JSON Content-Type，无法解析时按空对象处理。
///
/// - 发送成功: 201
/// - 发送失败: 记录错误，500
/// - `ttl` / `delay` 不是数字: 400
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let cmd = SendNotificationRequest::from_body(&body)
        .and_then(SendNotificationRequest::into_command)
        .map_err(ApiError::BadRequest)?;

    state.send_notification_handler.handle(cmd).await?;

    Ok(StatusCode::CREATED)
}
