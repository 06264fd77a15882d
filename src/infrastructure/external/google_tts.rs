//! Google Cloud Text-to-Speech クライアント
//! Application層の SpeechSynthesizer トレイトを実装

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::traits::SpeechSynthesizer;
use crate::error::{AnkiVocabError, Result};

const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

pub struct GoogleTtsClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// 読み上げ速度を `<prosody rate>` で包んだ SSML
pub fn build_ssml(text: &str, speed: f32) -> String {
    let rate = (speed * 100.0).round() as i32;
    format!(
        r#"<speak><prosody rate="{}%">{}</prosody></speak>"#,
        rate,
        escape_xml(text)
    )
}

/// 音声名の先頭 2 要素を言語コードとみなす（`en-US-Neural2-F` → `en-US`）
pub fn language_code(voice: &str) -> String {
    let parts: Vec<&str> = voice.splitn(3, '-').collect();
    match parts.as_slice() {
        [lang, region, ..] => format!("{}-{}", lang, region),
        _ => "en-US".to_string(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_audio(body: &str) -> Result<Vec<u8>> {
    let parsed: SynthesizeResponse = serde_json::from_str(body)
        .map_err(|e| AnkiVocabError::SpeechSynthesis(format!("unexpected response: {}", e)))?;
    let content = parsed
        .audio_content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AnkiVocabError::SpeechSynthesis("no audio stream returned".into()))?;
    STANDARD
        .decode(content)
        .map_err(|e| AnkiVocabError::SpeechSynthesis(format!("invalid audio payload: {}", e)))
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>> {
        let body = json!({
            "input": { "ssml": build_ssml(text, speed) },
            "voice": { "languageCode": language_code(voice), "name": voice },
            "audioConfig": { "audioEncoding": "MP3" },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AnkiVocabError::SpeechSynthesis(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnkiVocabError::SpeechSynthesis(format!("read failed: {}", e)))?;
        if !status.is_success() {
            return Err(AnkiVocabError::SpeechSynthesis(format!(
                "API request failed with status {}: {}",
                status, text
            )));
        }
        decode_audio(&text)
    }
}
