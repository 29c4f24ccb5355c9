//! Emotion - 表情标签值对象
//!
//! 推理引擎只支持固定的 7 类表情条件，标签集合与模型训练时一致，
//! 不可扩展。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 无法识别的表情标签
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown emotion label: {0}")]
pub struct InvalidEmotion(pub String);

/// 表情标签（固定 7 类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
}

impl Emotion {
    /// 全部合法标签，按固定顺序（用于校验错误提示）
    pub const LABELS: [&'static str; 7] = [
        "angry", "disgust", "fear", "happy", "neutral", "sad", "surprise",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Surprise => "surprise",
        }
    }

    /// 渲染 "angry, disgust, ..." 形式的合法标签列表
    pub fn labels_joined() -> String {
        Self::LABELS.join(", ")
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Self::Neutral
    }
}

impl FromStr for Emotion {
    type Err = InvalidEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angry" => Ok(Self::Angry),
            "disgust" => Ok(Self::Disgust),
            "fear" => Ok(Self::Fear),
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "sad" => Ok(Self::Sad),
            "surprise" => Ok(Self::Surprise),
            other => Err(InvalidEmotion(other.to_string())),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
