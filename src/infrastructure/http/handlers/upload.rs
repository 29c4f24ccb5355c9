//! Upload Handlers
//!
//! 参考图与驱动音频共用同一套 multipart 解析,
//! 目标文件名取自 file 部分自带的文件名。

use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;

use crate::application::{AssetKind, UploadError};
use crate::infrastructure::http::dto::UploadResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 从 multipart 表单取出 file 部分的文件名与内容
async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Vec<u8>), UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Malformed(e.to_string()))?;
        return Ok((filename, data.to_vec()));
    }

    Err(UploadError::MissingFile)
}

async fn store_upload(
    state: &AppState,
    kind: AssetKind,
    multipart: &mut Multipart,
    message: &'static str,
) -> Result<Json<UploadResponse>, ApiError> {
    let (filename, data) = read_file_part(multipart).await?;
    let asset = state.upload_handler.handle(kind, &filename, &data).await?;
    Ok(Json(UploadResponse::new(asset, message)))
}

/// Upload image endpoint - 上传参考图
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(
        &state,
        AssetKind::Image,
        &mut multipart,
        "Image uploaded successfully",
    )
    .await
}

/// Upload audio endpoint - 上传驱动音频
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_upload(
        &state,
        AssetKind::Audio,
        &mut multipart,
        "Audio uploaded successfully",
    )
    .await
}
