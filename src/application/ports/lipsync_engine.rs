//! Lipsync Engine Port - 唇形同步推理引擎抽象
//!
//! 定义推理引擎的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 推理引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 模型权重文件缺失，引擎无法构建
    #[error("Checkpoint not found: {}", .0.display())]
    CheckpointMissing(PathBuf),

    #[error("Failed to start inference worker: {0}")]
    Spawn(String),

    #[error("Inference worker protocol error: {0}")]
    Protocol(String),

    /// 引擎在生成过程中报错（显存不足、媒体损坏、数值异常等）
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Inference worker exited unexpectedly: {0}")]
    WorkerExited(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 单次推理请求
///
/// 所有路径均已解析为绝对路径，引擎不做二次解析
#[derive(Debug, Clone)]
pub struct InferRequest {
    /// 请求标识（用于日志和 worker 协议回显）
    pub job_id: Uuid,
    /// 参考人像图片路径
    pub ref_path: PathBuf,
    /// 驱动音频路径
    pub audio_path: PathBuf,
    /// 期望写出的视频路径
    pub res_video_path: PathBuf,
    /// audio guidance scale
    pub a_cfg_scale: f32,
    /// reference guidance scale
    pub r_cfg_scale: f32,
    /// emotion guidance scale
    pub e_cfg_scale: f32,
    /// 情绪标签，空串表示不做情绪约束
    pub emotion: String,
    /// 采样步数 (number of function evaluations)
    pub nfe: u32,
    /// 跳过人脸裁剪预处理
    pub no_crop: bool,
    /// 随机种子
    pub seed: u64,
    /// 引擎侧详细日志开关
    pub verbose: bool,
}

/// 单次推理响应
#[derive(Debug, Clone)]
pub struct InferResponse {
    /// 引擎实际写出的视频路径
    pub video_path: PathBuf,
    /// 推理耗时（毫秒）
    pub elapsed_ms: Option<u64>,
}

/// Lipsync Engine Port
///
/// 推理引擎的抽象接口。调用方负责串行化：引擎实现可以假定
/// 任意时刻最多只有一个 infer 在执行。
#[async_trait]
pub trait LipsyncEnginePort: Send + Sync {
    /// 执行一次唇形同步推理，阻塞直至视频落盘或失败
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, EngineError>;
}

/// 引擎构建器
///
/// 引擎构建代价高（加载权重、占用加速设备），由 [`crate::application::AgentCell`]
/// 在首次生成请求时通过本接口延迟构建；构建失败不会被缓存。
#[async_trait]
pub trait EngineBuilder: Send + Sync {
    async fn build(&self) -> Result<Arc<dyn LipsyncEnginePort>, EngineError>;
}
