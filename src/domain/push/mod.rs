//! Push Context - 推送限界上下文
//!
//! 职责:
//! - 订阅、载荷、发送选项等值对象（单次请求内有效，不持久化）
//! - VAPID 密钥与联系人标识

mod errors;
mod vapid;
mod value_objects;

pub use errors::VapidError;
pub use vapid::{VapidDetails, VapidKeys, VapidSubject};
pub use value_objects::{Delay, Payload, SendOptions, Subscription, Ttl};
