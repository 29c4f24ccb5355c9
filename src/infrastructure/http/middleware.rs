//! HTTP Middleware
//!
//! HTTP 状态码日志中间件

use axum::{extract::Request, middleware::Next, response::Response};

/// 按状态码分级记录失败请求
///
/// 4xx 记 warn,5xx 记 error,成功请求交给 TraceLayer。
/// 错误响应体的具体内容由 ApiError::into_response() 记录。
pub async fn status_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            latency_ms,
            "HTTP client error"
        );
    }

    response
}
