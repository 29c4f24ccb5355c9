//! Domain Layer - 领域层
//!
//! 与 HTTP、推理引擎均无关的纯业务规则:
//! - Emotion: 情绪标签值对象
//! - Naming: 输出文件命名策略

mod emotion;
mod naming;

pub use emotion::{Emotion, InvalidEmotion};
pub use naming::{derive_output_filename, NamingInputs};
