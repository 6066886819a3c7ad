//! Push Relay - Web Push 通知演示服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Push Context: VAPID 身份、订阅、TTL、延迟等值对象
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PushSender）
//! - Commands: 发送通知命令及处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 路由、中间件链、静态文件
//! - Adapters: Web Push 发送器（真实 / Fake）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
