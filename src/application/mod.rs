//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（LipsyncEngine、AssetStore）
//! - agent: 共享推理引擎的生命周期与推理互斥
//! - validation: 生成请求校验
//! - generate: 生成用例
//! - upload: 上传用例
//! - error: 应用层错误定义

pub mod agent;
pub mod error;
pub mod generate;
pub mod ports;
pub mod upload;
pub mod validation;

// Re-exports
pub use agent::AgentCell;
pub use error::{GenerateError, UploadError};
pub use generate::{GenerateCommand, GenerateHandler, GenerateResult};
pub use ports::{
    AssetStorePort, EngineBuilder, EngineError, InferRequest, InferResponse, LipsyncEnginePort,
    StoreError,
};
pub use upload::{AssetKind, StoredAsset, UploadHandler};
pub use validation::{validate_request, ResolvedInputs};
