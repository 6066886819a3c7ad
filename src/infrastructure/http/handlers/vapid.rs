//! VAPID Public Key Handler

use axum::extract::State;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// 返回配置的公钥（纯文本），浏览器用作 `applicationServerKey`
pub async fn vapid_public_key(State(state): State<Arc<AppState>>) -> String {
    state.vapid_public_key.clone()
}
