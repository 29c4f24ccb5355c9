//! Process Lipsync Client - 外部推理 worker 进程客户端
//!
//! 实现 LipsyncEnginePort trait，把 FLOAT 推理 runner 托管为长驻子进程，
//! 通过 stdin/stdout 上的 JSON 行协议交互：
//!
//! 启动后 worker 先输出一行 `{"event":"ready",...}`；
//! 每个请求写一行 JSON，随后读取若干 `progress` 行，
//! 以一行 `done`（带视频路径）或 `error`（带消息）结束。
//!
//! worker 死亡（stdout EOF）映射为错误，不自动重启；重试是调用方的事。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::application::ports::{
    EngineBuilder, EngineError, InferRequest, InferResponse, LipsyncEnginePort,
};

/// 发给 worker 的请求行
#[derive(Debug, Serialize)]
struct WorkerRequest {
    id: String,
    ref_path: PathBuf,
    audio_path: PathBuf,
    res_video_path: PathBuf,
    a_cfg_scale: f32,
    r_cfg_scale: f32,
    e_cfg_scale: f32,
    emotion: String,
    nfe: u32,
    no_crop: bool,
    seed: u64,
    verbose: bool,
}

impl From<InferRequest> for WorkerRequest {
    fn from(request: InferRequest) -> Self {
        Self {
            id: request.job_id.to_string(),
            ref_path: request.ref_path,
            audio_path: request.audio_path,
            res_video_path: request.res_video_path,
            a_cfg_scale: request.a_cfg_scale,
            r_cfg_scale: request.r_cfg_scale,
            e_cfg_scale: request.e_cfg_scale,
            emotion: request.emotion,
            nfe: request.nfe,
            no_crop: request.no_crop,
            seed: request.seed,
            verbose: request.verbose,
        }
    }
}

/// worker 的回复行
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WorkerReply {
    Ready {
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        device: Option<String>,
    },
    Progress {
        #[serde(default)]
        stage: Option<String>,
        #[serde(default)]
        percent: Option<f32>,
    },
    Done {
        video_path: PathBuf,
        #[serde(default)]
        elapsed_ms: Option<u64>,
    },
    Error {
        message: String,
    },
}

/// Process Lipsync Client 配置
#[derive(Debug, Clone)]
pub struct ProcessLipsyncClientConfig {
    /// Python 解释器
    pub python_bin: String,
    /// worker 入口脚本
    pub worker_script: PathBuf,
    /// 模型权重文件
    pub checkpoint_path: PathBuf,
    /// 加速设备序号
    pub device_index: u32,
    /// 结果目录，worker 构建时固定
    pub results_dir: PathBuf,
    /// ready 握手超时（秒），权重加载可能需要数分钟
    pub ready_timeout_secs: u64,
}

impl Default for ProcessLipsyncClientConfig {
    fn default() -> Self {
        Self {
            python_bin: "python3".to_string(),
            worker_script: PathBuf::from("inference/worker.py"),
            checkpoint_path: PathBuf::from("checkpoints/float.pth"),
            device_index: 0,
            results_dir: PathBuf::from("results"),
            ready_timeout_secs: 300,
        }
    }
}

/// worker 进程的读写端，调用方独占持有
#[derive(Debug)]
struct WorkerIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    child: Child,
}

impl WorkerIo {
    /// 读取下一行非空回复；EOF 表示 worker 已死
    async fn read_reply(&mut self) -> Result<WorkerReply, EngineError> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.stdout.read_line(&mut line).await?;
            if n == 0 {
                return Err(EngineError::WorkerExited(self.describe_exit()));
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return serde_json::from_str(trimmed).map_err(|e| {
                EngineError::Protocol(format!("bad reply line {:?}: {}", trimmed, e))
            });
        }
    }

    fn describe_exit(&mut self) -> String {
        match self.child.try_wait() {
            Ok(Some(status)) => format!("worker exited with {}", status),
            _ => "worker closed its stdout".to_string(),
        }
    }
}

/// Process Lipsync Client
///
/// 进程在 [`spawn`](ProcessLipsyncClient::spawn) 时启动并完成 ready 握手，
/// 之后常驻。内部持锁保证请求与回复成对交错。
#[derive(Debug)]
pub struct ProcessLipsyncClient {
    io: Mutex<WorkerIo>,
}

impl ProcessLipsyncClient {
    /// 启动 worker 进程并等待 ready 握手
    ///
    /// 权重文件缺失时直接失败，不产生任何子进程。握手阶段的
    /// 所有失败都按构建失败上报，并回收已启动的子进程。
    pub async fn spawn(config: &ProcessLipsyncClientConfig) -> Result<Self, EngineError> {
        if !config.checkpoint_path.exists() {
            return Err(EngineError::CheckpointMissing(
                config.checkpoint_path.clone(),
            ));
        }

        tracing::info!(
            worker = %config.worker_script.display(),
            checkpoint = %config.checkpoint_path.display(),
            device = config.device_index,
            "Starting lip-sync inference worker"
        );

        let mut child = Command::new(&config.python_bin)
            .arg("-u")
            .arg(&config.worker_script)
            .arg("--ckpt")
            .arg(&config.checkpoint_path)
            .arg("--res-dir")
            .arg(&config.results_dir)
            .arg("--device")
            .arg(config.device_index.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EngineError::Spawn(format!("failed to start {}: {}", config.python_bin, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("worker stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("worker stdout not captured".to_string()))?;

        let mut io = WorkerIo {
            stdin,
            stdout: BufReader::new(stdout),
            child,
        };

        let ready_timeout = Duration::from_secs(config.ready_timeout_secs);
        let reply = match tokio::time::timeout(ready_timeout, io.read_reply()).await {
            Err(_) => {
                let _ = io.child.start_kill();
                return Err(EngineError::Spawn(format!(
                    "worker produced no ready handshake within {}s",
                    config.ready_timeout_secs
                )));
            }
            Ok(Err(e)) => {
                let _ = io.child.start_kill();
                return Err(EngineError::Spawn(format!(
                    "worker failed during startup: {}",
                    e
                )));
            }
            Ok(Ok(reply)) => reply,
        };

        match reply {
            WorkerReply::Ready { model, device } => {
                tracing::info!(model = ?model, device = ?device, "Inference worker ready");
            }
            other => {
                let _ = io.child.start_kill();
                return Err(EngineError::Spawn(format!(
                    "expected ready handshake, got {:?}",
                    other
                )));
            }
        }

        Ok(Self { io: Mutex::new(io) })
    }
}

#[async_trait]
impl LipsyncEnginePort for ProcessLipsyncClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, EngineError> {
        let started = Instant::now();
        let job_id = request.job_id;

        let wire = WorkerRequest::from(request);
        let mut line = serde_json::to_string(&wire)
            .map_err(|e| EngineError::Protocol(format!("failed to encode request: {}", e)))?;
        line.push('\n');

        let mut io = self.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        // progress 行只记日志，直到 done 或 error 收尾
        loop {
            match io.read_reply().await? {
                WorkerReply::Progress { stage, percent } => {
                    tracing::debug!(
                        job_id = %job_id,
                        stage = ?stage,
                        percent = ?percent,
                        "Inference progress"
                    );
                }
                WorkerReply::Done {
                    video_path,
                    elapsed_ms,
                } => {
                    let elapsed =
                        elapsed_ms.unwrap_or_else(|| started.elapsed().as_millis() as u64);
                    return Ok(InferResponse {
                        video_path,
                        elapsed_ms: Some(elapsed),
                    });
                }
                WorkerReply::Error { message } => {
                    return Err(EngineError::Inference(message));
                }
                WorkerReply::Ready { .. } => {
                    return Err(EngineError::Protocol(
                        "unexpected ready event during inference".to_string(),
                    ));
                }
            }
        }
    }
}

/// Process Engine Builder
///
/// 每次 build 都重新检查权重并启动一个新 worker；构建失败由
/// 调用方决定是否重试，这里不缓存任何状态。
pub struct ProcessEngineBuilder {
    config: ProcessLipsyncClientConfig,
}

impl ProcessEngineBuilder {
    pub fn new(config: ProcessLipsyncClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EngineBuilder for ProcessEngineBuilder {
    async fn build(&self) -> Result<Arc<dyn LipsyncEnginePort>, EngineError> {
        let client = ProcessLipsyncClient::spawn(&self.config).await?;
        Ok(Arc::new(client))
    }
}

// ============================================================================
// Tests
// ============================================================================
