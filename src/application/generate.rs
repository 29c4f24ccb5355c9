//! Generate Use Case - 唇形同步生成编排
//!
//! 流程固定：取引擎、校验、命名、推理、回显。
//! 引擎构建失败只让当次请求失败，进程与已缓存的引擎都不受影响。

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use uuid::Uuid;

use crate::application::agent::AgentCell;
use crate::application::error::GenerateError;
use crate::application::ports::{AssetStorePort, InferRequest};
use crate::application::validation::validate_request;
use crate::domain::{derive_output_filename, NamingInputs};

/// 生成成功的统一文案
const SUCCESS_MESSAGE: &str = "Lip-sync video generated successfully";

/// 生成命令
///
/// 字段默认值由 HTTP DTO 的 serde 默认填充，到这里全部已就位
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    pub ref_image: String,
    pub audio_file: String,
    pub emotion: String,
    pub a_cfg_scale: f32,
    pub r_cfg_scale: f32,
    pub e_cfg_scale: f32,
    pub nfe: u32,
    pub no_crop: bool,
    pub seed: u64,
    /// 显式输出文件名，缺省时按命名策略派生
    pub output_file: Option<String>,
}

/// 生成结果，回显输入并携带落盘位置
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub ref_image: String,
    pub audio_file: String,
    pub emotion: String,
    pub output_path: PathBuf,
    pub output_file: String,
    pub message: &'static str,
}

/// Generate Handler - 生成用例处理器
pub struct GenerateHandler {
    agent: Arc<AgentCell>,
    assets: Arc<dyn AssetStorePort>,
    /// 结果目录（启动时已创建并规范化）
    results_dir: PathBuf,
}

impl GenerateHandler {
    pub fn new(
        agent: Arc<AgentCell>,
        assets: Arc<dyn AssetStorePort>,
        results_dir: PathBuf,
    ) -> Self {
        Self {
            agent,
            assets,
            results_dir,
        }
    }

    pub async fn handle(&self, cmd: GenerateCommand) -> Result<GenerateResult, GenerateError> {
        let job_id = Uuid::new_v4();

        // 获取共享引擎，必要时触发构建
        self.agent.get().await?;

        // 校验并解析输入路径
        let resolved = validate_request(self.assets.as_ref(), &cmd).await?;

        // 输出命名：显式名字原样使用，否则按参数派生
        let output_file = match &cmd.output_file {
            Some(name) => name.clone(),
            None => derive_output_filename(
                &NamingInputs {
                    ref_image: &cmd.ref_image,
                    audio_file: &cmd.audio_file,
                    emotion: &cmd.emotion,
                    a_cfg_scale: cmd.a_cfg_scale,
                    e_cfg_scale: cmd.e_cfg_scale,
                    nfe: cmd.nfe,
                    seed: cmd.seed,
                },
                Local::now(),
            ),
        };
        let res_video_path = self.results_dir.join(&output_file);

        tracing::info!(
            job_id = %job_id,
            ref_image = %cmd.ref_image,
            audio_file = %cmd.audio_file,
            emotion = %cmd.emotion,
            nfe = cmd.nfe,
            seed = cmd.seed,
            output_file = %output_file,
            "Dispatching lip-sync inference"
        );

        // 推理，由 AgentCell 串行化
        let response = self
            .agent
            .run_inference(InferRequest {
                job_id,
                ref_path: resolved.ref_path,
                audio_path: resolved.audio_path,
                res_video_path,
                a_cfg_scale: cmd.a_cfg_scale,
                r_cfg_scale: cmd.r_cfg_scale,
                e_cfg_scale: cmd.e_cfg_scale,
                emotion: cmd.emotion.clone(),
                nfe: cmd.nfe,
                no_crop: cmd.no_crop,
                seed: cmd.seed,
                verbose: true,
            })
            .await?;

        tracing::info!(
            job_id = %job_id,
            video_path = %response.video_path.display(),
            elapsed_ms = ?response.elapsed_ms,
            "Lip-sync inference finished"
        );

        Ok(GenerateResult {
            ref_image: cmd.ref_image,
            audio_file: cmd.audio_file,
            emotion: cmd.emotion,
            output_path: response.video_path,
            output_file,
            message: SUCCESS_MESSAGE,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        EngineBuilder, EngineError, InferResponse, LipsyncEnginePort, StoreError,
    };
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct FakeAssets {
        base: PathBuf,
        existing: Vec<&'static str>,
    }

    #[async_trait]
    impl AssetStorePort for FakeAssets {
        fn resolve(&self, name: &str) -> PathBuf {
            self.base.join(name)
        }

        async fn exists(&self, name: &str) -> bool {
            self.existing.iter().any(|n| *n == name)
        }

        async fn save(&self, name: &str, _data: &[u8]) -> Result<PathBuf, StoreError> {
            Ok(self.resolve(name))
        }

        fn base_dir(&self) -> &Path {
            &self.base
        }
    }

    /// 记录收到的请求，可配置失败次数
    struct RecordingEngine {
        calls: AtomicUsize,
        failures_left: AtomicUsize,
        last_request: Mutex<Option<InferRequest>>,
    }

    impl RecordingEngine {
        fn new(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(failures),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LipsyncEnginePort for RecordingEngine {
        async fn infer(&self, request: InferRequest) -> Result<InferResponse, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let video_path = request.res_video_path.clone();
            *self.last_request.lock().await = Some(request);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(EngineError::Inference("CUDA out of memory".to_string()));
            }
            Ok(InferResponse {
                video_path,
                elapsed_ms: Some(1),
            })
        }
    }

    struct StubBuilder {
        engine: Option<Arc<RecordingEngine>>,
        builds: AtomicUsize,
    }

    #[async_trait]
    impl EngineBuilder for StubBuilder {
        async fn build(&self) -> Result<Arc<dyn LipsyncEnginePort>, EngineError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            match &self.engine {
                Some(engine) => Ok(engine.clone() as Arc<dyn LipsyncEnginePort>),
                None => Err(EngineError::CheckpointMissing(PathBuf::from(
                    "checkpoints/float.pth",
                ))),
            }
        }
    }

    fn handler(
        existing: Vec<&'static str>,
        engine: Option<Arc<RecordingEngine>>,
    ) -> (GenerateHandler, Arc<StubBuilder>) {
        let builder = Arc::new(StubBuilder {
            engine,
            builds: AtomicUsize::new(0),
        });
        let agent = Arc::new(AgentCell::new(builder.clone()));
        let assets = Arc::new(FakeAssets {
            base: PathBuf::from("/srv/assets"),
            existing,
        });
        (
            GenerateHandler::new(agent, assets, PathBuf::from("/srv/results")),
            builder,
        )
    }

    fn command() -> GenerateCommand {
        GenerateCommand {
            ref_image: "a.png".to_string(),
            audio_file: "b.wav".to_string(),
            emotion: "neutral".to_string(),
            a_cfg_scale: 2.0,
            r_cfg_scale: 1.0,
            e_cfg_scale: 1.0,
            nfe: 10,
            no_crop: false,
            seed: 15,
            output_file: None,
        }
    }

    #[tokio::test]
    async fn test_success_echoes_inputs_and_derives_auditable_name() {
        let engine = Arc::new(RecordingEngine::new(0));
        let (handler, _) = handler(vec!["a.png", "b.wav"], Some(engine.clone()));

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(result.ref_image, "a.png");
        assert_eq!(result.audio_file, "b.wav");
        assert_eq!(result.emotion, "neutral");
        assert_eq!(result.message, "Lip-sync video generated successfully");
        for token in ["nfe10", "seed15", "acfg2.0", "ecfg1.0", "neutral"] {
            assert!(
                result.output_file.contains(token),
                "missing {} in {}",
                token,
                result.output_file
            );
        }
        assert_eq!(
            result.output_path,
            PathBuf::from("/srv/results").join(&result.output_file)
        );

        let request = engine.last_request.lock().await.clone().unwrap();
        assert_eq!(request.ref_path, PathBuf::from("/srv/assets/a.png"));
        assert_eq!(request.audio_path, PathBuf::from("/srv/assets/b.wav"));
        assert!(request.verbose);
    }

    #[tokio::test]
    async fn test_explicit_output_file_is_used_verbatim() {
        let engine = Arc::new(RecordingEngine::new(0));
        let (handler, _) = handler(vec!["a.png", "b.wav"], Some(engine));

        let mut cmd = command();
        cmd.output_file = Some("custom.mp4".to_string());
        let result = handler.handle(cmd).await.unwrap();

        assert_eq!(result.output_file, "custom.mp4");
        assert_eq!(result.output_path, PathBuf::from("/srv/results/custom.mp4"));
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_engine() {
        let engine = Arc::new(RecordingEngine::new(0));
        let (handler, _) = handler(vec!["a.png"], Some(engine.clone()));

        let err = handler.handle(command()).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation {
                field: "audio_file",
                ..
            }
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_checkpoint_is_a_configuration_error() {
        let (handler, builder) = handler(vec!["a.png", "b.wav"], None);

        let err = handler.handle(command()).await.unwrap_err();
        match err {
            GenerateError::Configuration(message) => {
                assert!(message.contains("Checkpoint not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // 失败未被缓存，下一次请求重新尝试构建
        let _ = handler.handle(command()).await.unwrap_err();
        assert_eq!(builder.builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_engine_failure_does_not_invalidate_agent() {
        let engine = Arc::new(RecordingEngine::new(1));
        let (handler, builder) = handler(vec!["a.png", "b.wav"], Some(engine.clone()));

        let err = handler.handle(command()).await.unwrap_err();
        match err {
            GenerateError::Inference(message) => assert_eq!(message, "CUDA out of memory"),
            other => panic!("unexpected error: {:?}", other),
        }

        // 同一个引擎实例继续服务后续请求
        assert!(handler.handle(command()).await.is_ok());
        assert_eq!(builder.builds.load(Ordering::SeqCst), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }
}
