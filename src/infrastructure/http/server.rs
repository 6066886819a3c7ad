//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::{
    cors, enforce_https, error_logging_middleware, hide_config_files, index_redirect, preflight,
    root_index_redirect, worker_cache_control,
};
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3003,
            static_dir: PathBuf::from("./"),
        }
    }
}

impl HttpServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn withstatic_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 构建完整的 Router（路由 + 中间件链）
///
/// `layer` 越靠后越先执行，因此中间件按执行顺序倒序添加。
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    create_routes(static_dir)
        .layer(middleware::from_fn(hide_config_files))
        .layer(middleware::from_fn(worker_cache_control))
        .layer(middleware::from_fn(preflight))
        .layer(middleware::from_fn(enforce_https))
        .layer(middleware::from_fn(root_index_redirect))
        .layer(middleware::from_fn(index_redirect))
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state.clone(), &self.config.static_dir);
        let addr = self.config.addr();

        let listener = TcpListener::bind(&addr).await?;
        info!(
            "app.listen on http://localhost:{} (bound {})",
            self.config.port, addr
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{PushError, PushSenderPort};
    use crate::infrastructure::adapters::FakePushSender;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::json;
    use tower::util::ServiceExt;

    const PUBLIC_KEY: &str = "BExamplePublicKey";

    struct TestApp {
        router: Router,
        sender: Arc<FakePushSender>,
        static_dir: tempfile::TempDir,
    }

    fn app_with(sender: FakePushSender) -> TestApp {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("index.html"), "<h1>push</h1>").unwrap();
        std::fs::write(static_dir.path().join("service-worker.js"), "self.onpush = 1;").unwrap();

        let sender = Arc::new(sender);
        let port: Arc<dyn PushSenderPort> = sender.clone();
        let state = Arc::new(AppState::new(PUBLIC_KEY, port));
        TestApp {
            router: build_router(state, static_dir.path()),
            sender,
            static_dir: static_dir,
        }
    }

    fn app() -> TestApp {
        app_with(FakePushSender::new())
    }

    fn local(method: Method, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "localhost:3003")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap()
    }

    fn send_body(delay: serde_json::Value) -> Body {
        Body::from(
            json!({
                "subscription": {
                    "endpoint": "https://push.example.com/abc",
                    "keys": { "p256dh": "key", "auth": "auth" }
                },
                "payload": "hello",
                "ttl": 120,
                "delay": delay
            })
            .to_string(),
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_vapid_public_key() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::GET, "/vapidPublicKey", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body_text(response).await, PUBLIC_KEY);
    }

    #[tokio::test]
    async fn test_register_accepts_any_body() {
        let app = app();
        for body in ["{\"subscription\":{}}", "not json at all", ""] {
            let response = app
                .router
                .clone()
                .oneshot(local(Method::POST, "/register", Body::from(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }
        assert!(app.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_notification_success() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::POST, "/sendNotification", send_body(json!(0))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let sent = app.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].options.ttl.as_secs(), 120);
        assert_eq!(sent[0].payload.as_deref(), Some(&b"hello"[..]));
    }

    #[tokio::test]
    async fn test_send_notification_failure_is_500() {
        let app = app_with(FakePushSender::failing(|| {
            PushError::NetworkError("connection refused".to_string())
        }));
        let response = app
            .router
            .oneshot(local(Method::POST, "/sendNotification", send_body(json!("0"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_send_notification_rejects_non_numeric_delay() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::POST, "/sendNotification", send_body(json!("later"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_root_index_redirect_runs_before_routes() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::GET, "/index.html", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_remote_host_is_redirected_to_https() {
        let app = app();
        let request = Request::builder()
            .uri("/vapidPublicKey")
            .header(header::HOST, "example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/vapidPublicKey"
        );
        assert_eq!(
            response.headers()[header::STRICT_TRANSPORT_SECURITY],
            "max-age=15768000"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_preflight_from_remote_host_is_redirected_to_https() {
        let app = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/sendNotification")
            .header(header::HOST, "example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/sendNotification"
        );
        assert_eq!(
            response.headers()[header::STRICT_TRANSPORT_SECURITY],
            "max-age=15768000"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_preflight_for_root_index_is_redirected() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::OPTIONS, "/index.html", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_local_preflight_is_no_content() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::OPTIONS, "/sendNotification", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(app.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_config_files_in_static_dir_are_not_served() {
        let app = app();
        let static_dir = app.static_dir.path();
        std::fs::write(
            static_dir.join("config.local.toml"),
            "[vapid]\nprivate_key = \"SECRET\"\n",
        )
        .unwrap();
        std::fs::write(static_dir.join("config.toml"), "[server]\nport = 3003\n").unwrap();

        for uri in ["/config.local.toml", "/config.toml", "/config%2Elocal.toml"] {
            let response = app
                .router
                .clone()
                .oneshot(local(Method::GET, uri, Body::empty()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
            assert!(!body_text(response).await.contains("SECRET"));
        }
    }

    #[tokio::test]
    async fn test_send_notification_without_json_content_type() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/sendNotification")
            .header(header::HOST, "localhost:3003")
            .body(Body::from("nope"))
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let sent = app.sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subscription.as_value().is_null());
    }

    #[tokio::test]
    async fn test_send_notification_unparseable_body_fails_send() {
        let app = app_with(FakePushSender::failing(|| {
            PushError::InvalidSubscription("missing endpoint".to_string())
        }));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/sendNotification")
            .header(header::HOST, "localhost:3003")
            .body(Body::empty())
            .unwrap();
        let response = app.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_send_notification_mistyped_ttl_is_400() {
        let app = app();
        let response = app
            .router
            .oneshot(local(
                Method::POST,
                "/sendNotification",
                Body::from(r#"{"ttl": true}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_static_files_and_worker_cache() {
        let app = app();

        let response = app
            .router
            .clone()
            .oneshot(local(Method::GET, "/", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>push</h1>");

        let response = app
            .router
            .clone()
            .oneshot(local(Method::GET, "/service-worker.js", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=0");
    }

    #[tokio::test]
    async fn test_missing_static_file_is_404() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::GET, "/missing.png", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_ping() {
        let app = app();
        let response = app
            .router
            .oneshot(local(Method::GET, "/ping", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_server_config() {
        let config = HttpServerConfig::new("127.0.0.1", 8080).withstatic_dir("public");
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(HttpServerConfig::default().addr(), "0.0.0.0:3003");
    }
}
