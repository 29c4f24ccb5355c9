//! Model Agent Lifecycle - 推理引擎生命周期管理
//!
//! 引擎是全进程唯一的共享句柄：
//! - 首次使用时才构建（加载权重耗时且可能失败）
//! - 构建失败不缓存，后续调用重新尝试
//! - 并发首次调用只构建一次
//! - 推理调用串行化，其余操作不经过锁

use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::application::ports::{
    EngineBuilder, EngineError, InferRequest, InferResponse, LipsyncEnginePort,
};

/// 共享引擎单元
///
/// 对外只暴露 [`get`](AgentCell::get) 与
/// [`run_inference`](AgentCell::run_inference)，构建与互斥细节由本类型封装。
pub struct AgentCell {
    builder: Arc<dyn EngineBuilder>,
    engine: OnceCell<Arc<dyn LipsyncEnginePort>>,
    /// 推理互斥锁。引擎独占一块加速设备，并发推理会破坏设备状态
    infer_gate: Mutex<()>,
}

impl AgentCell {
    pub fn new(builder: Arc<dyn EngineBuilder>) -> Self {
        Self {
            builder,
            engine: OnceCell::new(),
            infer_gate: Mutex::new(()),
        }
    }

    /// 获取共享引擎，必要时触发构建
    ///
    /// 并发调用只执行一次构建；构建失败时单元保持未初始化，
    /// 下一次调用重新构建而不是返回缓存的失败。
    pub async fn get(&self) -> Result<Arc<dyn LipsyncEnginePort>, EngineError> {
        self.engine
            .get_or_try_init(|| async { self.builder.build().await })
            .await
            .map(Arc::clone)
    }

    /// 串行执行一次推理
    ///
    /// 同一时刻最多一个推理在引擎上运行。校验、上传、健康检查
    /// 不经过此锁，推理进行期间照常服务。
    pub async fn run_inference(&self, request: InferRequest) -> Result<InferResponse, EngineError> {
        let engine = self.get().await?;
        let _gate = self.infer_gate.lock().await;
        engine.infer(request).await
    }
}

// ============================================================================
// Tests
// ============================================================================
