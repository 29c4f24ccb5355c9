//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod asset_store;
mod lipsync_engine;

pub use asset_store::{AssetStorePort, StoreError};
pub use lipsync_engine::{
    EngineBuilder, EngineError, InferRequest, InferResponse, LipsyncEnginePort,
};
