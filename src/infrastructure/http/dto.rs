//! Data Transfer Objects - HTTP 请求/响应结构
//!
//! 请求体的缺省值与推理 worker 的命令行默认参数保持一致,
//! 响应体回显请求输入,便于客户端对账。

use serde::{Deserialize, Serialize};

use crate::application::{GenerateCommand, GenerateResult, StoredAsset};

// ============================================================================
// Generate DTOs
// ============================================================================

fn default_emotion() -> String {
    "neutral".to_string()
}

fn default_a_cfg_scale() -> f32 {
    2.0
}

fn default_r_cfg_scale() -> f32 {
    1.0
}

fn default_e_cfg_scale() -> f32 {
    1.0
}

fn default_nfe() -> u32 {
    10
}

fn default_seed() -> u64 {
    25
}

/// 生成请求
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// 参考图文件名(相对素材目录)
    pub ref_image: String,
    /// 驱动音频文件名(相对素材目录)
    pub audio_file: String,
    #[serde(default = "default_emotion")]
    pub emotion: String,
    #[serde(default = "default_a_cfg_scale")]
    pub a_cfg_scale: f32,
    #[serde(default = "default_r_cfg_scale")]
    pub r_cfg_scale: f32,
    #[serde(default = "default_e_cfg_scale")]
    pub e_cfg_scale: f32,
    #[serde(default = "default_nfe")]
    pub nfe: u32,
    #[serde(default)]
    pub no_crop: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// 显式指定输出文件名,缺省时按请求参数自动派生
    #[serde(default)]
    pub output_file: Option<String>,
}

impl From<GenerateRequest> for GenerateCommand {
    fn from(req: GenerateRequest) -> Self {
        Self {
            ref_image: req.ref_image,
            audio_file: req.audio_file,
            emotion: req.emotion,
            a_cfg_scale: req.a_cfg_scale,
            r_cfg_scale: req.r_cfg_scale,
            e_cfg_scale: req.e_cfg_scale,
            nfe: req.nfe,
            no_crop: req.no_crop,
            seed: req.seed,
            output_file: req.output_file,
        }
    }
}

/// 生成成功响应
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub ref_image: String,
    pub audio_file: String,
    pub emotion: String,
    pub output_path: String,
    pub output_file: String,
    pub message: &'static str,
}

impl From<GenerateResult> for GenerateResponse {
    fn from(result: GenerateResult) -> Self {
        Self {
            status: "success",
            ref_image: result.ref_image,
            audio_file: result.audio_file,
            emotion: result.emotion,
            output_path: result.output_path.display().to_string(),
            output_file: result.output_file,
            message: result.message,
        }
    }
}

// ============================================================================
// Upload DTOs
// ============================================================================

/// 上传成功响应
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub filename: String,
    pub path: String,
    pub message: &'static str,
}

impl UploadResponse {
    pub fn new(asset: StoredAsset, message: &'static str) -> Self {
        Self {
            status: "success",
            filename: asset.filename,
            path: asset.path.display().to_string(),
            message,
        }
    }
}
