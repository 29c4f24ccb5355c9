//! HTTP Routes
//!
//! API 路由定义,与对外暴露的路径一一对应:
//! - /              GET   服务自述
//! - /health        GET   健康检查(会触发引擎构建)
//! - /generate      POST  生成唇形同步视频
//! - /upload-image  POST  上传参考图
//! - /upload-audio  POST  上传驱动音频

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/generate", post(handlers::generate))
        .route("/upload-image", post(handlers::upload_image))
        .route("/upload-audio", post(handlers::upload_audio))
}
