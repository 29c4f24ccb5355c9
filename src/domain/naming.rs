//! 输出文件命名策略
//!
//! 未显式指定输出文件名时，按请求参数派生一个可审计、按时间排序的
//! 文件名。同一秒内参数完全相同的两次请求得到相同文件名并相互覆盖，
//! 不做冲突检测。

use chrono::{DateTime, Local};
use std::path::Path;

/// 时间戳格式：秒级精度，可排序，不含文件系统保留字符
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// 派生文件名所需的请求参数
#[derive(Debug, Clone)]
pub struct NamingInputs<'a> {
    pub ref_image: &'a str,
    pub audio_file: &'a str,
    pub emotion: &'a str,
    pub a_cfg_scale: f32,
    pub e_cfg_scale: f32,
    pub nfe: u32,
    pub seed: u64,
}

/// 依据请求参数与调用时刻派生输出文件名
///
/// 形如 `2024-05-01T12-30-00-face-speech-nfe10-seed25-acfg2.0-ecfg1.0-neutral.mp4`，
/// 除时间戳外全部生成参数均可从文件名还原。guidance scale 使用 `{:?}`
/// 格式化以保留小数点（`2.0` 而不是 `2`）。
pub fn derive_output_filename(inputs: &NamingInputs<'_>, now: DateTime<Local>) -> String {
    format!(
        "{}-{}-{}-nfe{}-seed{}-acfg{:?}-ecfg{:?}-{}.mp4",
        now.format(TIMESTAMP_FORMAT),
        file_stem(inputs.ref_image),
        file_stem(inputs.audio_file),
        inputs.nfe,
        inputs.seed,
        inputs.a_cfg_scale,
        inputs.e_cfg_scale,
        inputs.emotion,
    )
}

/// 去掉扩展名后的文件名主干
fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn inputs<'a>() -> NamingInputs<'a> {
        NamingInputs {
            ref_image: "face.png",
            audio_file: "speech.wav",
            emotion: "neutral",
            a_cfg_scale: 2.0,
            e_cfg_scale: 1.0,
            nfe: 10,
            seed: 25,
        }
    }

    #[test]
    fn test_derived_name_is_fully_auditable() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let name = derive_output_filename(&inputs(), now);
        assert_eq!(
            name,
            "2024-05-01T12-30-00-face-speech-nfe10-seed25-acfg2.0-ecfg1.0-neutral.mp4"
        );
    }

    #[test]
    fn test_scales_keep_decimal_point() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut i = inputs();
        i.a_cfg_scale = 1.5;
        let name = derive_output_filename(&i, now);
        assert!(name.contains("acfg1.5"));
        assert!(name.contains("ecfg1.0"));
    }

    #[test]
    fn test_different_seconds_produce_distinct_names() {
        let first = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let second = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 1).unwrap();
        let a = derive_output_filename(&inputs(), first);
        let b = derive_output_filename(&inputs(), second);
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_second_same_inputs_same_name() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let a = derive_output_filename(&inputs(), now);
        let b = derive_output_filename(&inputs(), now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stems_drop_extension_only() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut i = inputs();
        i.ref_image = "portrait.v2.PNG";
        i.audio_file = "take_3.wav";
        let name = derive_output_filename(&i, now);
        assert!(name.contains("-portrait.v2-take_3-"));
    }
}
