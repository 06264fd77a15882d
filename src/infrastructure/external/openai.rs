//! OpenAI Chat Completions API クライアント
//! JSON 応答モードで本文を取得する。ドメイン型への変換は openai_adapter が行う

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AnkiVocabError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI Chat Completions クライアント（JSON 応答モード）
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 互換 API やテスト用サーバーへ向ける
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// JSON オブジェクトを返すよう指示して本文を取得する
    pub async fn chat_json(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnkiVocabError::ContentGeneration(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnkiVocabError::ContentGeneration(format!("read failed: {}", e)))?;

        if !status.is_success() {
            return Err(AnkiVocabError::ContentGeneration(format!(
                "API request failed with status {}: {}",
                status, body
            )));
        }

        extract_content(&body)
    }
}

/// レスポンス本文から最初の choice の content を取り出す
fn extract_content(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        AnkiVocabError::ContentGeneration(format!("unexpected response shape: {}", e))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AnkiVocabError::ContentGeneration("response contained no content".into()))
}
