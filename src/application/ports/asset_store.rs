//! Asset Store Port - 素材存储抽象
//!
//! 资产目录对编排层只读，仅上传操作写入；结果目录不在此抽象内，
//! 由推理引擎直接写入

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asset Store Port
///
/// 路径解析是纯函数；存在性检查与写入走异步文件系统
#[async_trait]
pub trait AssetStorePort: Send + Sync {
    /// 资产目录下的完整路径（不检查存在性）
    fn resolve(&self, name: &str) -> PathBuf;

    /// 资产文件是否存在
    async fn exists(&self, name: &str) -> bool;

    /// 将上传内容原样写入资产目录，覆盖同名文件，返回落盘路径
    async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StoreError>;

    /// 资产目录路径（用于健康信息与日志）
    fn base_dir(&self) -> &Path;
}
