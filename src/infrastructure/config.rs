//! ユーザー設定ファイル（`~/.config/anki-vocab/config.json`）
//!
//! 優先順位: 既定値 < 設定ファイル < 環境変数。CLI フラグは呼び出し側で上書きする。

use crate::error::{AnkiVocabError, Result};
use crate::utils::config::EnvConfig;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_DECK: &str = "English Vocabulary";
pub const DEFAULT_MODEL: &str = "Basic (and reversed card)";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_VOICE: &str = "en-US-Neural2-F";
pub const DEFAULT_ANKI_HOST: &str = "localhost";
pub const DEFAULT_ANKI_PORT: u16 = 8765;

/// 解決済みの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub deck_name: String,
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts_api_key: Option<String>,
    pub voice: String,
    pub anki_host: String,
    pub anki_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deck_name: DEFAULT_DECK.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            tts_api_key: None,
            voice: DEFAULT_VOICE.to_string(),
            anki_host: DEFAULT_ANKI_HOST.to_string(),
            anki_port: DEFAULT_ANKI_PORT,
        }
    }
}

/// 設定ファイルの内容。全キー省略可
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub deck_name: Option<String>,
    pub model_name: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub tts_api_key: Option<String>,
    pub voice: Option<String>,
    pub anki_host: Option<String>,
    pub anki_port: Option<u16>,
}

/// 設定ファイルのパス。`ANKI_VOCAB_CONFIG` があればそれを使う
pub fn config_path(env: &EnvConfig) -> PathBuf {
    if let Some(path) = &env.config_path {
        return PathBuf::from(path);
    }
    let home = BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("anki-vocab").join("config.json")
}

/// 設定ファイルを読む。存在しなければ空設定
pub fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let f = fs::File::open(path)?;
    serde_json::from_reader(f).map_err(|e| {
        AnkiVocabError::Config(format!("invalid config file {}: {}", path.display(), e))
    })
}

impl AppConfig {
    /// 既定の場所から読み込み、環境変数で上書きする
    pub fn load() -> Result<Self> {
        let env = EnvConfig::get();
        Self::load_from(&config_path(&env), &env)
    }

    pub fn load_from(path: &Path, env: &EnvConfig) -> Result<Self> {
        let file = read_file_config(path)?;
        Self::resolve(file, env)
    }

    /// 既定値 < ファイル < 環境変数 の順に合成する
    pub fn resolve(file: FileConfig, env: &EnvConfig) -> Result<Self> {
        let defaults = AppConfig::default();
        let port = match &env.anki_port {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AnkiVocabError::Config(format!("ANKI_PORT must be a port number, got '{}'", raw))
            })?,
            None => file.anki_port.unwrap_or(defaults.anki_port),
        };

        Ok(Self {
            deck_name: pick(&env.deck_name, file.deck_name, defaults.deck_name),
            model_name: pick(&env.model_name, file.model_name, defaults.model_name),
            openai_api_key: env.openai_api_key.clone().or(file.openai_api_key),
            openai_model: pick(&env.openai_model, file.openai_model, defaults.openai_model),
            tts_api_key: env.tts_api_key.clone().or(file.tts_api_key),
            voice: pick(&env.voice, file.voice, defaults.voice),
            anki_host: pick(&env.anki_host, file.anki_host, defaults.anki_host),
            anki_port: port,
        })
    }

    /// AnkiConnect のエンドポイント
    pub fn anki_url(&self) -> String {
        format!("http://{}:{}", self.anki_host, self.anki_port)
    }

    /// 設定ファイルへ保存する（一時ファイル経由で置き換え）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        {
            let f = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&f, self)
                .map_err(|e| AnkiVocabError::Config(format!("failed to write config: {}", e)))?;
        }
        fs::rename(tmp, path)?;
        Ok(())
    }
}

fn pick(env: &Option<String>, file: Option<String>, default: String) -> String {
    env.clone().or(file).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        let config = AppConfig::resolve(FileConfig::default(), &EnvConfig::default()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.anki_url(), "http://localhost:8765");
    }

    /// 環境変数はファイルより優先される
    #[test]
    fn env_overrides_file() {
        let file = FileConfig {
            deck_name: Some("File Deck".into()),
            model_name: Some("File Model".into()),
            anki_port: Some(9000),
            ..Default::default()
        };
        let env = EnvConfig {
            deck_name: Some("Env Deck".into()),
            anki_port: Some("8766".into()),
            ..Default::default()
        };
        let config = AppConfig::resolve(file, &env).unwrap();
        assert_eq!(config.deck_name, "Env Deck");
        assert_eq!(config.model_name, "File Model");
        assert_eq!(config.anki_port, 8766);
    }

    #[test]
    fn invalid_port_is_config_error() {
        let env = EnvConfig {
            anki_port: Some("eighty".into()),
            ..Default::default()
        };
        let err = AppConfig::resolve(FileConfig::default(), &env).unwrap_err();
        assert!(matches!(err, AnkiVocabError::Config(_)));
    }

    #[test]
    fn config_path_honours_override() {
        let env = EnvConfig {
            config_path: Some("/tmp/custom.json".into()),
            ..Default::default()
        };
        assert_eq!(config_path(&env), PathBuf::from("/tmp/custom.json"));

        let default = config_path(&EnvConfig::default());
        assert!(default.ends_with(".config/anki-vocab/config.json"));
    }
}
