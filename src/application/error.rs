//! 应用层错误定义
//!
//! 错误在这里只分类，HTTP 状态码与响应体格式由 infrastructure/http 层决定

use thiserror::Error;

use crate::application::ports::{EngineError, StoreError};

/// 生成用例错误
#[derive(Debug, Error)]
pub enum GenerateError {
    /// 引擎无法构建（权重文件缺失、worker 启动失败）
    #[error("{0}")]
    Configuration(String),

    /// 请求参数校验失败，field 指明出错字段
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// 引擎在推理过程中报错
    #[error("{0}")]
    Inference(String),
}

impl GenerateError {
    /// 创建校验错误
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<EngineError> for GenerateError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::CheckpointMissing(_) | EngineError::Spawn(_) => {
                Self::Configuration(err.to_string())
            }
            // worker 上报的错误信息本身已是完整描述，不再叠前缀
            EngineError::Inference(message) => Self::Inference(message),
            other => Self::Inference(other.to_string()),
        }
    }
}

/// 上传用例错误
#[derive(Debug, Error)]
pub enum UploadError {
    /// multipart 表单里没有文件部分
    #[error("no file part in multipart form")]
    MissingFile,

    /// 文件名为空或无法还原出文件名成分
    #[error("invalid upload filename: {0:?}")]
    InvalidFilename(String),

    /// multipart 流读取失败
    #[error("malformed multipart body: {0}")]
    Malformed(String),

    /// 落盘失败
    #[error("{0}")]
    Io(String),
}

impl From<StoreError> for UploadError {
    fn from(err: StoreError) -> Self {
        Self::Io(err.to_string())
    }
}
