//! HTTP Error Handling - API 错误类型与响应映射
//!
//! 错误通过真实的 HTTP 状态码表达:客户端输入问题返回 400,
//! 服务端故障返回 500,响应体统一为 `{"detail": "..."}`。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{GenerateError, UploadError};

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// API 错误
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 请求参数或请求体不合法
    #[error("{0}")]
    BadRequest(String),

    /// 服务端处理失败
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::Validation { .. } => ApiError::BadRequest(e.to_string()),
            GenerateError::Configuration(_) | GenerateError::Inference(_) => {
                ApiError::Internal(format!("Generation failed: {}", e))
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::MissingFile
            | UploadError::InvalidFilename(_)
            | UploadError::Malformed(_) => ApiError::BadRequest(format!("Upload failed: {}", e)),
            UploadError::Io(msg) => ApiError::Internal(format!("Upload failed: {}", msg)),
        }
    }
}
