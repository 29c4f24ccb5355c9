//! Viseme - 唇形同步视频生成编排服务
//!
//! 架构设计: Hexagonal Architecture (Ports & Adapters)
//!
//! 领域层 (domain/):
//! - Emotion: 表情标签值对象（固定 7 类）
//! - naming: 输出文件命名策略（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（LipsyncEngine, AssetStore）
//! - AgentCell: 模型 Agent 生命周期管理（惰性单例 + 推理串行化）
//! - GenerateHandler / UploadHandler: 用例编排
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（/generate, /upload-image, /upload-audio, /health）
//! - Adapters: 推理引擎客户端（子进程 / Fake）、文件存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
