//! Health Handler
//!
//! 健康检查会真正触碰引擎:引擎尚未构建时就地构建,
//! 构建失败返回 500,成功则回报三个工作目录。

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub checkpoint: String,
    pub assets_dir: String,
    pub results_dir: String,
}

/// Health endpoint - 确认引擎可用
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .agent
        .get()
        .await
        .map_err(|e| ApiError::Internal(format!("Health check failed: {}", e)))?;

    Ok(Json(HealthResponse {
        status: "healthy",
        checkpoint: state.checkpoint_path.display().to_string(),
        assets_dir: state.assets.base_dir().display().to_string(),
        results_dir: state.results.base_dir().display().to_string(),
    }))
}
