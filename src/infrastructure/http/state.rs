//! Application State
//!
//! 启动时构造一次，请求之间只读共享

use std::sync::Arc;

use crate::application::{PushSenderPort, SendNotificationHandler};

/// 应用状态
pub struct AppState {
    /// 返回给浏览器的 VAPID 公钥
    pub vapid_public_key: String,

    pub send_notification_handler: SendNotificationHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(vapid_public_key: impl Into<String>, push_sender: Arc<dyn PushSenderPort>) -> Self {
        Self {
            vapid_public_key: vapid_public_key.into(),
            send_notification_handler: SendNotificationHandler::new(push_sender),
        }
    }
}
