//! Index Handler
//!
//! 服务自述端点,列出可用路由

use axum::Json;
use serde::Serialize;

/// 路由清单,键为路径
#[derive(Serialize)]
pub struct EndpointList {
    #[serde(rename = "/generate")]
    pub generate: &'static str,
    #[serde(rename = "/upload-image")]
    pub upload_image: &'static str,
    #[serde(rename = "/upload-audio")]
    pub upload_audio: &'static str,
    #[serde(rename = "/health")]
    pub health: &'static str,
}

/// 服务自述响应
#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub description: &'static str,
    pub endpoints: EndpointList,
}

/// Index endpoint - 服务自述
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "viseme lip-sync generation API",
        description: "Generate lip-synced videos from reference images and audio",
        endpoints: EndpointList {
            generate: "POST - Generate lip-synced video",
            upload_image: "POST - Upload reference image",
            upload_audio: "POST - Upload driving audio",
            health: "GET - Check API health",
        },
    })
}
