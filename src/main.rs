//! Viseme - 唇形同步视频生成编排服务
//!
//! Hexagonal Architecture:
//! - Domain: emotion, naming
//! - Application: ports, agent, generate / upload / validation
//! - Infrastructure: http, adapters (engine, storage)

use std::sync::Arc;

use viseme::application::ports::EngineBuilder;
use viseme::application::AgentCell;
use viseme::config::{load_config, print_config, EngineMode};
use viseme::infrastructure::adapters::{
    FakeEngineBuilder, FileAssetStore, ProcessEngineBuilder, ProcessLipsyncClientConfig,
    ResultStore,
};
use viseme::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},viseme={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Viseme - 唇形同步视频生成编排服务");
    print_config(&config);

    // 创建并规范化工作目录，健康检查会回显这些路径
    let assets = Arc::new(FileAssetStore::new(&config.storage.assets_dir).await?);
    let results = Arc::new(ResultStore::new(&config.storage.results_dir).await?);

    // 按配置选择引擎实现
    let builder: Arc<dyn EngineBuilder> = match config.engine.mode {
        EngineMode::Process => Arc::new(ProcessEngineBuilder::new(ProcessLipsyncClientConfig {
            python_bin: config.engine.python_bin.clone(),
            worker_script: config.engine.worker_script.clone(),
            checkpoint_path: config.engine.checkpoint_path.clone(),
            device_index: config.engine.device_index,
            results_dir: results.base_dir().to_path_buf(),
            ready_timeout_secs: config.engine.ready_timeout_secs,
        })),
        EngineMode::Fake => Arc::new(FakeEngineBuilder::default()),
    };
    let agent = Arc::new(AgentCell::new(builder));

    // 预热：尝试构建引擎；失败只告警，首个请求会重新构建
    match agent.get().await {
        Ok(_) => tracing::info!("Lip-sync engine pre-loaded"),
        Err(e) => tracing::warn!(
            "Engine pre-load failed, will retry on first request: {}",
            e
        ),
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(
        &config.server.host,
        config.server.port,
        config.storage.max_upload_size as usize,
    );
    let state = AppState::new(
        agent,
        assets,
        results,
        config.engine.checkpoint_path.clone(),
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
