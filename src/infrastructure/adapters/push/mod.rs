//! Push Adapter - 推送发送器实现

mod fake_push_sender;
mod web_push_sender;

pub use fake_push_sender::{FakePushSender, SentPush};
pub use web_push_sender::{WebPushSender, WebPushSenderConfig};
