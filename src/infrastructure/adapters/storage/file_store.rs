//! File Store - 文件系统资产与结果存储
//!
//! 实现 AssetStorePort trait；ResultStore 是结果目录的路径封装，
//! 实际写入由推理引擎完成

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AssetStorePort, StoreError};

/// 文件系统资产存储
pub struct FileAssetStore {
    /// 存储根目录，构建时已规范化为绝对路径
    base_dir: PathBuf,
}

impl FileAssetStore {
    /// 创建新的资产存储
    ///
    /// 目录不存在则建立，随后规范化，保证对外给出的都是绝对路径
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        let base_dir = fs::canonicalize(&base_dir).await?;
        Ok(Self { base_dir })
    }
}

#[async_trait]
impl AssetStorePort for FileAssetStore {
    fn resolve(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    async fn exists(&self, name: &str) -> bool {
        fs::try_exists(self.resolve(name)).await.unwrap_or(false)
    }

    async fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.resolve(name);
        fs::write(&path, data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Saved asset"
        );

        Ok(path)
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// 结果目录
///
/// 启动时创建并规范化；推理引擎往这里写视频，编排层只持有
/// 目录路径，从不读写内容
pub struct ResultStore {
    base_dir: PathBuf,
}

impl ResultStore {
    /// 创建结果目录（不存在则建立）并规范化
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        let base_dir = fs::canonicalize(&base_dir).await?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

// ============================================================================
// Tests
// ============================================================================
