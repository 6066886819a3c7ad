//! HTTP Middleware
//!
//! 请求进入路由前依次经过：
//! 1. `cors`                 - 所有响应（包括重定向）都带 CORS 响应头
//! 2. `index_redirect`       - `.../dir/index.html?q` → `.../dir/?q`
//! 3. `root_index_redirect`  - `/index.html` → `/` (301)
//! 4. `enforce_https`        - 非 localhost 加 HSTS，并把非 https 请求重定向
//! 5. `preflight`            - OPTIONS 直接 204
//! 6. `worker_cache_control` - service worker 脚本禁止缓存
//! 7. `hide_config_files`    - 配置文件不作为静态文件返回
//!
//! 任何一步发出响应即终止后续步骤。组装顺序见 `server::build_router`。

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, HOST, LOCATION, STRICT_TRANSPORT_SECURITY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CONFIG_FILE_NAMES;

const INDEX_HTML: &str = "index.html";
const HSTS_VALUE: &str = "max-age=15768000";
const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_HEADERS: &str = "Origin, Content-Type, Accept";
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const NO_CACHE: &str = "public, max-age=0";
const WORKER_SCRIPTS: &[&str] = &["service-worker.js", "worker.js"];

/// 请求目标（路径 + 查询串）
fn request_target(request: &Request) -> &str {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
}

/// 以指定状态码重定向
fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// 目录下的 index.html 是否应当去掉
///
/// 匹配 `/<任意>/index.html<任意>`：`index.html` 之前至少还有一个 `/`，
/// 因此根目录的 `/index.html` 不在此列，由 `root_index_redirect` 处理。
fn strip_nested_index(target: &str) -> Option<String> {
    let rest = target.get(1..)?;
    if rest.contains("/index.html") {
        Some(target.replacen(INDEX_HTML, "", 1))
    } else {
        None
    }
}

/// 去掉任意层级目录下的 `index.html`，保留查询串 (302)
pub async fn index_redirect(request: Request, next: Next) -> Response {
    if let Some(location) = strip_nested_index(request_target(&request)) {
        return redirect(StatusCode::FOUND, &location);
    }
    next.run(request).await
}

/// `/index.html` 永久重定向到 `/`
pub async fn root_index_redirect(request: Request, next: Next) -> Response {
    if request_target(&request) == "/index.html" {
        return redirect(StatusCode::MOVED_PERMANENTLY, "/");
    }
    next.run(request).await
}

fn request_host(request: &Request) -> Option<String> {
    request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
}

fn forwarded_https(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto == "https")
}

/// 非 localhost 访问时强制 HTTPS
///
/// 代理（`X-Forwarded-Proto`）报告原始请求不是 https 时，
/// 302 到同一 host + 路径的 `https://` 地址。没有 Host 的请求原样放行。
pub async fn enforce_https(request: Request, next: Next) -> Response {
    let Some(host) = request_host(&request) else {
        return next.run(request).await;
    };
    if host.starts_with("localhost") {
        return next.run(request).await;
    }

    let mut response = if forwarded_https(request.headers()) {
        next.run(request).await
    } else {
        let location = format!("https://{}{}", host, request_target(&request));
        tracing::debug!(location = %location, "Redirecting to https");
        redirect(StatusCode::FOUND, &location)
    };

    response
        .headers_mut()
        .insert(STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS_VALUE));
    response
}

fn insert_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
}

/// 所有响应都带 CORS 头
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    insert_cors_headers(response.headers_mut());
    response
}

/// OPTIONS 预检直接 204
///
/// 位于 `enforce_https` 之后：远程 host 的预检同样先被重定向到 https。
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }
    (
        StatusCode::NO_CONTENT,
        [(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        )],
    )
        .into_response()
}

/// 最后一个路径段是 service worker 脚本时禁止缓存
pub async fn worker_cache_control(request: Request, next: Next) -> Response {
    let is_worker = request
        .uri()
        .path()
        .rsplit('/')
        .next()
        .is_some_and(|file| WORKER_SCRIPTS.contains(&file));

    let mut response = next.run(request).await;
    if is_worker {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    }
    response
}

/// 解码路径段中的 `%XX`；非法序列原样保留
fn percent_decode(segment: &str) -> String {
    let mut decoded = Vec::with_capacity(segment.len());
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = segment
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// 路径的最后一段是否是启动时读取的配置文件（任意扩展名）
fn is_config_file(path: &str) -> bool {
    let file = percent_decode(path.rsplit('/').next().unwrap_or_default());
    let stem = file.rsplit_once('.').map_or(file.as_str(), |(stem, _)| stem);
    CONFIG_FILE_NAMES.contains(&stem)
}

/// 静态目录默认是工作目录，配置文件（可能含 VAPID 私钥）一律 404
pub async fn hide_config_files(request: Request, next: Next) -> Response {
    if is_config_file(request.uri().path()) {
        tracing::warn!(path = %request.uri().path(), "Refusing to serve config file");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// HTTP 状态码错误日志中间件
///
/// 4xx 记为 warn，5xx 记为 error
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}
