//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VISEME_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VISEME_SERVER__PORT=8001`
/// - `VISEME_ENGINE__MODE=fake`
/// - `VISEME_ENGINE__CHECKPOINT_PATH=/models/float.pth`
/// - `VISEME_STORAGE__ASSETS_DIR=/srv/assets`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8001)?
        .set_default("engine.mode", "process")?
        .set_default("engine.checkpoint_path", "checkpoints/float.pth")?
        .set_default("engine.device_index", 0)?
        .set_default("engine.python_bin", "python3")?
        .set_default("engine.worker_script", "inference/worker.py")?
        .set_default("engine.ready_timeout_secs", 300)?
        .set_default("storage.assets_dir", "assets")?
        .set_default("storage.results_dir", "results")?
        .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: VISEME_
    // 层级分隔符: __ (双下划线)
    // 例如: VISEME_ENGINE__MODE=fake
    builder = builder.add_source(
        Environment::with_prefix("VISEME")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.engine.python_bin.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine python_bin cannot be empty".to_string(),
        ));
    }

    if config.engine.checkpoint_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine checkpoint_path cannot be empty".to_string(),
        ));
    }

    if config.engine.ready_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine ready_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.storage.assets_dir.as_os_str().is_empty()
        || config.storage.results_dir.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Storage directories cannot be empty".to_string(),
        ));
    }

    if config.storage.max_upload_size == 0 {
        return Err(ConfigError::ValidationError(
            "Storage max_upload_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Engine Mode: {:?}", config.engine.mode);
    tracing::info!("Checkpoint: {:?}", config.engine.checkpoint_path);
    tracing::info!("Device Index: {}", config.engine.device_index);
    tracing::info!("Worker Script: {:?}", config.engine.worker_script);
    tracing::info!("Assets Directory: {:?}", config.storage.assets_dir);
    tracing::info!("Results Directory: {:?}", config.storage.results_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
