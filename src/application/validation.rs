//! Request Validator - 生成请求校验
//!
//! 按固定顺序检查，第一个失败即返回，不聚合多个错误。
//! 校验成功没有副作用，返回解析好的绝对输入路径。

use std::path::PathBuf;

use crate::application::error::GenerateError;
use crate::application::generate::GenerateCommand;
use crate::application::ports::AssetStorePort;
use crate::domain::Emotion;

/// 校验通过后解析出的输入路径
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub ref_path: PathBuf,
    pub audio_path: PathBuf,
}

/// 校验生成命令
///
/// 检查顺序固定：参考图存在、音频存在、情绪标签合法、数值参数合理。
pub async fn validate_request(
    assets: &dyn AssetStorePort,
    cmd: &GenerateCommand,
) -> Result<ResolvedInputs, GenerateError> {
    let ref_path = assets.resolve(&cmd.ref_image);
    if !assets.exists(&cmd.ref_image).await {
        return Err(GenerateError::validation(
            "ref_image",
            format!("Reference image not found: {}", cmd.ref_image),
        ));
    }

    let audio_path = assets.resolve(&cmd.audio_file);
    if !assets.exists(&cmd.audio_file).await {
        return Err(GenerateError::validation(
            "audio_file",
            format!("Audio file not found: {}", cmd.audio_file),
        ));
    }

    // 空串表示不做情绪约束，跳过标签校验
    if !cmd.emotion.is_empty() && cmd.emotion.parse::<Emotion>().is_err() {
        return Err(GenerateError::validation(
            "emotion",
            format!(
                "Invalid emotion '{}'. Must be one of: {}",
                cmd.emotion,
                Emotion::labels_joined()
            ),
        ));
    }

    if cmd.nfe == 0 {
        return Err(GenerateError::validation("nfe", "nfe must be at least 1"));
    }
    check_scale("a_cfg_scale", cmd.a_cfg_scale)?;
    check_scale("r_cfg_scale", cmd.r_cfg_scale)?;
    check_scale("e_cfg_scale", cmd.e_cfg_scale)?;

    Ok(ResolvedInputs {
        ref_path,
        audio_path,
    })
}

fn check_scale(field: &'static str, value: f32) -> Result<(), GenerateError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GenerateError::validation(
            field,
            format!("{} must be a positive finite number, got {}", field, value),
        ));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::StoreError;
    use async_trait::async_trait;
    use std::path::Path;

    struct FakeAssets {
        base: PathBuf,
        existing: Vec<&'static str>,
    }

    impl FakeAssets {
        fn with(existing: Vec<&'static str>) -> Self {
            Self {
                base: PathBuf::from("/srv/assets"),
                existing,
            }
        }
    }

    #[async_trait]
    impl AssetStorePort for FakeAssets {
        fn resolve(&self, name: &str) -> PathBuf {
            self.base.join(name)
        }

        async fn exists(&self, name: &str) -> bool {
            self.existing.iter().any(|n| *n == name)
        }

        async fn save(&self, name: &str, _data: &[u8]) -> Result<PathBuf, StoreError> {
            Ok(self.resolve(name))
        }

        fn base_dir(&self) -> &Path {
            &self.base
        }
    }

    fn command() -> GenerateCommand {
        GenerateCommand {
            ref_image: "face.png".to_string(),
            audio_file: "speech.wav".to_string(),
            emotion: "neutral".to_string(),
            a_cfg_scale: 2.0,
            r_cfg_scale: 1.0,
            e_cfg_scale: 1.0,
            nfe: 10,
            no_crop: false,
            seed: 25,
            output_file: None,
        }
    }

    #[tokio::test]
    async fn test_valid_command_resolves_absolute_paths() {
        let assets = FakeAssets::with(vec!["face.png", "speech.wav"]);
        let resolved = validate_request(&assets, &command()).await.unwrap();
        assert_eq!(resolved.ref_path, PathBuf::from("/srv/assets/face.png"));
        assert_eq!(resolved.audio_path, PathBuf::from("/srv/assets/speech.wav"));
    }

    #[tokio::test]
    async fn test_missing_ref_image_fails_first() {
        // 音频也缺失，但必须先报参考图
        let assets = FakeAssets::with(vec![]);
        let err = validate_request(&assets, &command()).await.unwrap_err();
        match err {
            GenerateError::Validation { field, message } => {
                assert_eq!(field, "ref_image");
                assert_eq!(message, "Reference image not found: face.png");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_audio_names_the_field() {
        let assets = FakeAssets::with(vec!["face.png"]);
        let err = validate_request(&assets, &command()).await.unwrap_err();
        match err {
            GenerateError::Validation { field, message } => {
                assert_eq!(field, "audio_file");
                assert_eq!(message, "Audio file not found: speech.wav");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_emotion_lists_all_labels() {
        let assets = FakeAssets::with(vec!["face.png", "speech.wav"]);
        let mut cmd = command();
        cmd.emotion = "furious".to_string();
        let err = validate_request(&assets, &cmd).await.unwrap_err();
        match err {
            GenerateError::Validation { field, message } => {
                assert_eq!(field, "emotion");
                assert_eq!(
                    message,
                    "Invalid emotion 'furious'. Must be one of: \
                     angry, disgust, fear, happy, neutral, sad, surprise"
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_emotion_is_allowed() {
        let assets = FakeAssets::with(vec!["face.png", "speech.wav"]);
        let mut cmd = command();
        cmd.emotion = String::new();
        assert!(validate_request(&assets, &cmd).await.is_ok());
    }

    #[tokio::test]
    async fn test_numeric_bounds() {
        let assets = FakeAssets::with(vec!["face.png", "speech.wav"]);

        let mut cmd = command();
        cmd.nfe = 0;
        let err = validate_request(&assets, &cmd).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation { field: "nfe", .. }
        ));

        let mut cmd = command();
        cmd.a_cfg_scale = f32::NAN;
        let err = validate_request(&assets, &cmd).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation {
                field: "a_cfg_scale",
                ..
            }
        ));

        let mut cmd = command();
        cmd.e_cfg_scale = -1.0;
        let err = validate_request(&assets, &cmd).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation {
                field: "e_cfg_scale",
                ..
            }
        ));
    }
}
