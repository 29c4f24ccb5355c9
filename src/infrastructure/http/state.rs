//! Application State - 应用状态
//!
//! 持有端口实例与用例 handler,在路由间共享

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{AgentCell, AssetStorePort, GenerateHandler, UploadHandler};
use crate::infrastructure::adapters::ResultStore;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub agent: Arc<AgentCell>,
    pub assets: Arc<dyn AssetStorePort>,
    pub results: Arc<ResultStore>,

    /// 健康检查时回显的权重路径
    pub checkpoint_path: PathBuf,

    // ========== Handlers ==========
    pub generate_handler: GenerateHandler,
    pub upload_handler: UploadHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        agent: Arc<AgentCell>,
        assets: Arc<dyn AssetStorePort>,
        results: Arc<ResultStore>,
        checkpoint_path: PathBuf,
    ) -> Self {
        Self {
            agent: agent.clone(),
            assets: assets.clone(),
            results: results.clone(),
            checkpoint_path,
            generate_handler: GenerateHandler::new(
                agent,
                assets.clone(),
                results.base_dir().to_path_buf(),
            ),
            upload_handler: UploadHandler::new(assets),
        }
    }
}
