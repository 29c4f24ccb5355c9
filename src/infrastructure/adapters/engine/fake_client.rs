//! Fake Lipsync Client - 用于测试与本地开发的引擎实现
//!
//! 不加载模型也不要求权重文件，把固定的 MP4 桩数据写到
//! 请求指定的输出路径

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    EngineBuilder, EngineError, InferRequest, InferResponse, LipsyncEnginePort,
};

/// 最小的 MP4 ftyp box，足够让下游按视频文件对待
const STUB_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

/// Fake Lipsync Client
///
/// 模拟一次耗时推理：睡眠设定的延迟，然后写出桩视频
pub struct FakeLipsyncClient {
    latency: Duration,
}

impl FakeLipsyncClient {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl LipsyncEnginePort for FakeLipsyncClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, EngineError> {
        tracing::debug!(
            job_id = %request.job_id,
            output = %request.res_video_path.display(),
            "FakeLipsyncClient: writing stub video"
        );

        // 模拟推理延迟
        tokio::time::sleep(self.latency).await;

        tokio::fs::write(&request.res_video_path, STUB_MP4).await?;

        Ok(InferResponse {
            video_path: request.res_video_path,
            elapsed_ms: Some(self.latency.as_millis() as u64),
        })
    }
}

/// Fake Engine Builder
///
/// 构建永远成功，适合没有权重文件的环境
pub struct FakeEngineBuilder {
    latency: Duration,
}

impl FakeEngineBuilder {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for FakeEngineBuilder {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[async_trait]
impl EngineBuilder for FakeEngineBuilder {
    async fn build(&self) -> Result<Arc<dyn LipsyncEnginePort>, EngineError> {
        tracing::info!(latency_ms = self.latency.as_millis() as u64, "FakeLipsyncClient initialized");
        Ok(Arc::new(FakeLipsyncClient::new(self.latency)))
    }
}

// ============================================================================
// Tests
// ============================================================================
