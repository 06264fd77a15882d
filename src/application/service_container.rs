//! サービスコンテナ
//!
//! # 責任
//! - 設定から外部クライアントを構築し VocabService を組み立てる
//! - テスト時のモック注入サポート

use crate::application::traits::{ContentGenerator, FlashcardService, SpeechSynthesizer};
use crate::application::vocab_service::VocabService;
use crate::error::{AnkiVocabError, Result};
use crate::infrastructure::AppConfig;
use crate::infrastructure::external::{
    AnkiConnectClient, GoogleTtsClient, OpenAiClient, OpenAiContentGenerator,
};

/// サービスコンテナ
pub struct ServiceContainer {
    pub config: AppConfig,
    pub vocab: VocabService,
}

impl ServiceContainer {
    /// 設定から実クライアントで構築する
    ///
    /// API キーの有無はここでは検証しない（削除モードでは不要なため）。
    pub fn new(config: AppConfig) -> Self {
        let generator = OpenAiContentGenerator::new(OpenAiClient::new(
            config.openai_api_key.clone().unwrap_or_default(),
            config.openai_model.clone(),
        ));
        let synthesizer = GoogleTtsClient::new(config.tts_api_key.clone().unwrap_or_default());
        let flashcards = AnkiConnectClient::new(config.anki_url());

        Self::with_dependencies(
            config,
            Box::new(generator),
            Box::new(synthesizer),
            Box::new(flashcards),
        )
    }

    /// 依存を指定して構築する
    pub fn with_dependencies(
        config: AppConfig,
        generator: Box<dyn ContentGenerator>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        flashcards: Box<dyn FlashcardService>,
    ) -> Self {
        Self {
            config,
            vocab: VocabService::new(generator, synthesizer, flashcards),
        }
    }

    /// 追加モードに必要な OpenAI キーを確認する
    pub fn require_openai_key(&self) -> Result<()> {
        if self.config.openai_api_key.is_none() {
            return Err(AnkiVocabError::Config(
                "OpenAI API key not found. Please set OPENAI_API_KEY environment variable or add it to config."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// 使用する音声名。音声無効、または音声合成キーが無い場合は `None`
    pub fn voice(&self, no_audio: bool, voice_override: Option<&str>) -> Option<String> {
        if no_audio {
            return None;
        }
        if self.config.tts_api_key.is_none() {
            log::warn!("GOOGLE_TTS_API_KEY is not set; cards will be added without audio");
            return None;
        }
        Some(
            voice_override
                .map(str::to_string)
                .unwrap_or_else(|| self.config.voice.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys(openai: Option<&str>, tts: Option<&str>) -> AppConfig {
        AppConfig {
            openai_api_key: openai.map(str::to_string),
            tts_api_key: tts.map(str::to_string),
            ..AppConfig::default()
        }
    }

    #[test]
    fn missing_openai_key_is_a_config_error() {
        let container = ServiceContainer::new(config_with_keys(None, None));
        let err = container.require_openai_key().unwrap_err();
        assert!(err.is_user_actionable());
    }

    #[test]
    fn voice_respects_no_audio_and_missing_key() {
        let container = ServiceContainer::new(config_with_keys(Some("k"), None));
        assert_eq!(container.voice(false, None), None);

        let container = ServiceContainer::new(config_with_keys(Some("k"), Some("t")));
        assert_eq!(container.voice(true, None), None);
        assert_eq!(
            container.voice(false, None).as_deref(),
            Some(crate::infrastructure::config::DEFAULT_VOICE)
        );
        assert_eq!(
            container.voice(false, Some("en-GB-Wavenet-B")).as_deref(),
            Some("en-GB-Wavenet-B")
        );
    }
}
