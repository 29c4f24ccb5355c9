//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 推理引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 引擎运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// 拉起 Python worker 子进程做真实推理
    Process,
    /// 进程内假引擎,写桩视频,无需权重文件
    Fake,
}

impl Default for EngineMode {
    fn default() -> Self {
        EngineMode::Process
    }
}

/// 推理引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 运行模式
    #[serde(default)]
    pub mode: EngineMode,

    /// 模型权重文件路径
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,

    /// 加速设备序号
    #[serde(default)]
    pub device_index: u32,

    /// Python 解释器
    #[serde(default = "default_python_bin")]
    pub python_bin: String,

    /// worker 入口脚本
    #[serde(default = "default_worker_script")]
    pub worker_script: PathBuf,

    /// 等待 worker ready 握手的上限（秒）
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("checkpoints/float.pth")
}

fn default_python_bin() -> String {
    "python3".to_string()
}

fn default_worker_script() -> PathBuf {
    PathBuf::from("inference/worker.py")
}

fn default_ready_timeout() -> u64 {
    300
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            checkpoint_path: default_checkpoint_path(),
            device_index: 0,
            python_bin: default_python_bin(),
            worker_script: default_worker_script(),
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 素材目录（参考图与驱动音频）
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// 结果目录（生成的视频）
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 50MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            results_dir: default_results_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
