//! Upload Use Case - 素材上传落盘
//!
//! 内容原样写入，不做格式或完整性校验；同名文件直接覆盖。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::error::UploadError;
use crate::application::ports::AssetStorePort;

/// 资产类别，只影响日志文案，两类都落在同一个资产目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    pub fn noun(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Audio => "audio",
        }
    }
}

/// 已落盘的资产
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub filename: String,
    pub path: PathBuf,
}

/// Upload Handler - 上传用例处理器
pub struct UploadHandler {
    assets: Arc<dyn AssetStorePort>,
}

impl UploadHandler {
    pub fn new(assets: Arc<dyn AssetStorePort>) -> Self {
        Self { assets }
    }

    /// 将上传内容写入资产目录
    ///
    /// 文件名先归约到最后一个路径成分，客户端提供的名字不能把
    /// 写入位置带出资产目录。
    pub async fn handle(
        &self,
        kind: AssetKind,
        filename: &str,
        data: &[u8],
    ) -> Result<StoredAsset, UploadError> {
        let safe_name = sanitize_filename(filename)?;
        let path = self.assets.save(safe_name, data).await?;

        tracing::info!(
            kind = kind.noun(),
            filename = safe_name,
            size = data.len(),
            "Asset uploaded"
        );

        Ok(StoredAsset {
            filename: safe_name.to_string(),
            path,
        })
    }
}

/// 取文件名的最后一个路径成分，拒绝空名
fn sanitize_filename(raw: &str) -> Result<&str, UploadError> {
    match Path::new(raw).file_name().and_then(|n| n.to_str()) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(UploadError::InvalidFilename(raw.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
