//! Engine Adapter - 推理引擎实现

mod fake_client;
mod process_client;

pub use fake_client::{FakeEngineBuilder, FakeLipsyncClient};
pub use process_client::{ProcessEngineBuilder, ProcessLipsyncClient, ProcessLipsyncClientConfig};
