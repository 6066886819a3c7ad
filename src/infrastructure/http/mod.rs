//! HTTP Layer - 推送中继的 HTTP 接口

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{build_router, HttpServer, HttpServerConfig};
pub use state::AppState;
