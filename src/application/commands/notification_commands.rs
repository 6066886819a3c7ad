//! Notification Commands - 推送相关命令

use crate::domain::push::{Delay, Payload, SendOptions, Subscription};

/// 发送通知命令
#[derive(Debug, Clone)]
pub struct SendNotificationCommand {
    pub subscription: Subscription,
    pub payload: Option<Payload>,
    pub options: SendOptions,
    pub delay: Delay,
}
