//! グローバル環境変数設定
//!
//! アプリケーション全体で使用する環境変数を一元管理。
//! プロセス起動時に一度だけ初期化し、以降はどこからでもアクセス可能。

use once_cell::sync::OnceCell;
use std::sync::Arc;

/// グローバル環境変数設定
static ENV_CONFIG: OnceCell<Arc<EnvConfig>> = OnceCell::new();

/// 環境変数設定
///
/// 値が設定されていない変数は `None`。空文字列も未設定として扱う。
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// OpenAI APIキー (`OPENAI_API_KEY`)
    pub openai_api_key: Option<String>,
    /// 生成モデル名 (`OPENAI_MODEL`)
    pub openai_model: Option<String>,
    /// 音声合成APIキー (`GOOGLE_TTS_API_KEY`)
    pub tts_api_key: Option<String>,
    /// 音声名 (`TTS_VOICE`)
    pub voice: Option<String>,
    /// AnkiConnect ホスト (`ANKI_HOST`)
    pub anki_host: Option<String>,
    /// AnkiConnect ポート (`ANKI_PORT`)、数値検証は AppConfig 側で行う
    pub anki_port: Option<String>,
    /// 既定デッキ (`DECK_NAME`)
    pub deck_name: Option<String>,
    /// 既定ノートタイプ (`MODEL_NAME`)
    pub model_name: Option<String>,
    /// 設定ファイルパスの上書き (`ANKI_VOCAB_CONFIG`)
    pub config_path: Option<String>,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl EnvConfig {
    /// 現在のプロセス環境から読み取る
    pub fn from_env() -> Self {
        Self {
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL"),
            tts_api_key: var("GOOGLE_TTS_API_KEY"),
            voice: var("TTS_VOICE"),
            anki_host: var("ANKI_HOST"),
            anki_port: var("ANKI_PORT"),
            deck_name: var("DECK_NAME"),
            model_name: var("MODEL_NAME"),
            config_path: var("ANKI_VOCAB_CONFIG"),
        }
    }

    /// 環境変数から設定を初期化
    ///
    /// アプリケーション起動時に呼び出す。
    /// 既に初期化済みの場合は何もしない（冪等）。
    pub fn init() {
        let _ = ENV_CONFIG.set(Arc::new(Self::from_env()));
    }

    /// 設定を取得。未初期化なら現在の環境から初期化する
    pub fn get() -> Arc<EnvConfig> {
        ENV_CONFIG
            .get_or_init(|| Arc::new(Self::from_env()))
            .clone()
    }
}
