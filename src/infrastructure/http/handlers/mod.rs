//! HTTP Handlers

mod notification;
mod ping;
mod register;
mod vapid;

pub use notification::*;
pub use ping::*;
pub use register::*;
pub use vapid::*;
