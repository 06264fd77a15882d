use std::fs;

use anki_vocab::AnkiVocabError;
use anki_vocab::infrastructure::AppConfig;
use anki_vocab::infrastructure::config::{DEFAULT_DECK, DEFAULT_MODEL};
use anki_vocab::utils::config::EnvConfig;
use tempfile::tempdir;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = AppConfig::load_from(&path, &EnvConfig::default()).unwrap();
    assert_eq!(config.deck_name, DEFAULT_DECK);
    assert_eq!(config.model_name, DEFAULT_MODEL);
    assert!(config.openai_api_key.is_none());
}

#[test]
fn test_file_values_are_read_and_env_wins() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"deck_name": "TOEIC", "openai_api_key": "sk-file", "anki_port": 8766}"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path, &EnvConfig::default()).unwrap();
    assert_eq!(config.deck_name, "TOEIC");
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-file"));
    assert_eq!(config.anki_url(), "http://localhost:8766");

    let env = EnvConfig {
        openai_api_key: Some("sk-env".into()),
        anki_host: Some("127.0.0.1".into()),
        ..Default::default()
    };
    let config = AppConfig::load_from(&path, &env).unwrap();
    assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
    assert_eq!(config.anki_url(), "http://127.0.0.1:8766");
}

#[test]
fn test_invalid_json_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let err = AppConfig::load_from(&path, &EnvConfig::default()).unwrap_err();
    assert!(matches!(err, AnkiVocabError::Config(_)));
    assert!(err.is_user_actionable());
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = AppConfig {
        deck_name: "Phrasal Verbs".into(),
        voice: "en-GB-Wavenet-B".into(),
        ..AppConfig::default()
    };

    config.save(&path).unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = AppConfig::load_from(&path, &EnvConfig::default()).unwrap();
    assert_eq!(loaded, config);
}
