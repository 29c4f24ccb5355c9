//! Generate Handler
//!
//! 唇形同步生成入口,校验与推理全部委托应用层

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{GenerateRequest, GenerateResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// Generate endpoint - 生成唇形同步视频
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let result = state.generate_handler.handle(req.into()).await?;
    Ok(Json(GenerateResponse::from(result)))
}
