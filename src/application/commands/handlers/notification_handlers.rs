//! Notification Command Handlers

use std::sync::Arc;

use crate::application::commands::notification_commands::SendNotificationCommand;
use crate::application::error::ApplicationError;
use crate::application::ports::PushSenderPort;

/// SendNotification Handler - 延迟后把通知交给推送端口
pub struct SendNotificationHandler {
    sender: Arc<dyn PushSenderPort>,
}

impl SendNotificationHandler {
    pub fn new(sender: Arc<dyn PushSenderPort>) -> Self {
        Self { sender }
    }

    /// 等待 `delay` 后发送，并等待推送服务的结果
    ///
    /// 发送在独立任务中执行：客户端断开连接不会取消已接受的发送。
    pub async fn handle(&self, cmd: SendNotificationCommand) -> Result<(), ApplicationError> {
        tracing::info!(
            subscription = %cmd.subscription.as_value(),
            payload_len = ?cmd.payload.as_ref().map(|p| p.len()),
            ttl = cmd.options.ttl.as_secs(),
            delay_ms = cmd.delay.as_duration().as_millis() as u64,
            "Send data"
        );

        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            if !cmd.delay.is_zero() {
                tokio::time::sleep(cmd.delay.as_duration()).await;
            }
            sender
                .send(&cmd.subscription, cmd.payload.as_ref(), cmd.options)
                .await
        });

        task.await
            .map_err(|e| ApplicationError::internal(format!("Send task failed: {}", e)))??;

        Ok(())
    }
}
