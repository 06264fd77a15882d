//! AnkiConnect クライアント
//! Application層の FlashcardService トレイトを実装

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::traits::FlashcardService;
use crate::domain::{AudioAsset, NewNote, NoteInfo};
use crate::error::{AnkiVocabError, Result};

const API_VERSION: u32 = 6;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// `error` が null でなければ失敗として扱う
    pub fn into_result(self) -> Result<Option<T>> {
        match self.error {
            Some(error) => Err(AnkiVocabError::FlashcardService(error)),
            None => Ok(self.result),
        }
    }
}

/// リクエスト本文 `{action, version, params}`
pub fn request_body(action: &str, params: Option<Value>) -> Value {
    let mut body = json!({ "action": action, "version": API_VERSION });
    if let Some(params) = params {
        body["params"] = params;
    }
    body
}

pub struct AnkiConnectClient {
    http: Client,
    url: String,
}

impl AnkiConnectClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<Option<T>> {
        log::debug!("AnkiConnect action: {}", action);
        let response = self
            .http
            .post(&self.url)
            .json(&request_body(action, params))
            .send()
            .await
            .map_err(|e| {
                AnkiVocabError::FlashcardService(format!(
                    "Cannot connect to Anki. Make sure Anki is running with AnkiConnect installed. Error: {}",
                    e
                ))
            })?;

        let parsed: ApiResponse<T> = response.json().await.map_err(|e| {
            AnkiVocabError::FlashcardService(format!("unexpected response to '{}': {}", action, e))
        })?;
        parsed.into_result()
    }

    /// 結果が必須のアクション
    async fn invoke<T: DeserializeOwned>(&self, action: &str, params: Option<Value>) -> Result<T> {
        self.request(action, params).await?.ok_or_else(|| {
            AnkiVocabError::FlashcardService(format!("'{}' returned no result", action))
        })
    }
}

#[async_trait]
impl FlashcardService for AnkiConnectClient {
    async fn model_names(&self) -> Result<Vec<String>> {
        self.invoke("modelNames", None).await
    }

    async fn model_field_names(&self, model_name: &str) -> Result<Vec<String>> {
        self.invoke("modelFieldNames", Some(json!({ "modelName": model_name })))
            .await
    }

    async fn deck_names(&self) -> Result<Vec<String>> {
        self.invoke("deckNames", None).await
    }

    async fn create_deck(&self, deck_name: &str) -> Result<u64> {
        self.invoke("createDeck", Some(json!({ "deck": deck_name })))
            .await
    }

    async fn find_notes(&self, query: &str) -> Result<Vec<u64>> {
        self.invoke("findNotes", Some(json!({ "query": query })))
            .await
    }

    async fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>> {
        self.invoke("notesInfo", Some(json!({ "notes": note_ids })))
            .await
    }

    async fn delete_notes(&self, note_ids: &[u64]) -> Result<()> {
        // deleteNotes は result が null
        self.request::<Value>("deleteNotes", Some(json!({ "notes": note_ids })))
            .await?;
        Ok(())
    }

    async fn store_media_file(&self, asset: &AudioAsset) -> Result<String> {
        self.invoke("storeMediaFile", Some(store_media_params(asset)))
            .await
    }

    async fn add_note(&self, note: &NewNote) -> Result<u64> {
        if !note.audio.is_empty() {
            log::info!("attaching {} audio file(s) to note", note.audio.len());
        }
        self.invoke("addNote", Some(json!({ "note": add_note_params(note) })))
            .await
    }
}

/// `storeMediaFile` のパラメータ（base64 データをそのまま渡す）
pub fn store_media_params(asset: &AudioAsset) -> Value {
    json!({ "filename": asset.filename, "data": asset.data })
}

/// `addNote` の note パラメータ（重複はデッキ内で禁止）
pub fn add_note_params(note: &NewNote) -> Value {
    let mut value = json!(note);
    value["options"] = json!({ "allowDuplicate": false, "duplicateScope": "deck" });
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AudioAsset, FieldMap};

    #[test]
    fn request_body_has_version_six() {
        let body = request_body("deckNames", None);
        assert_eq!(body, json!({"action": "deckNames", "version": 6}));

        let body = request_body("findNotes", Some(json!({"query": "deck:x"})));
        assert_eq!(body["params"]["query"], "deck:x");
    }

    #[test]
    fn non_null_error_is_a_failure() {
        let response: ApiResponse<u64> =
            serde_json::from_str(r#"{"result": null, "error": "deck was not found"}"#).unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, AnkiVocabError::FlashcardService(ref m) if m == "deck was not found"));
    }

    #[test]
    fn null_result_without_error_is_ok() {
        let response: ApiResponse<Value> =
            serde_json::from_str(r#"{"result": null, "error": null}"#).unwrap();
        assert!(response.into_result().unwrap().is_none());
    }

    #[test]
    fn add_note_params_match_anki_connect_shape() {
        let mut fields = FieldMap::new();
        fields.insert("Front".into(), "run".into());
        let mut asset = AudioAsset::new("word_run.mp3".into(), b"abc");
        asset.target_fields = vec!["Back".into()];
        let note = NewNote {
            deck_name: "Deck".into(),
            model_name: "Basic".into(),
            fields,
            tags: vec!["english".into()],
            audio: vec![asset],
        };

        let params = add_note_params(&note);
        assert_eq!(params["deckName"], "Deck");
        assert_eq!(params["modelName"], "Basic");
        assert_eq!(params["fields"]["Front"], "run");
        assert_eq!(params["options"]["duplicateScope"], "deck");
        assert_eq!(params["audio"][0]["filename"], "word_run.mp3");
        assert_eq!(params["audio"][0]["fields"], json!(["Back"]));
    }

    #[test]
    fn store_media_params_carry_filename_and_data() {
        let asset = AudioAsset::new("example_run_1.mp3".into(), b"abc");
        let params = store_media_params(&asset);
        assert_eq!(params, json!({"filename": "example_run_1.mp3", "data": "YWJj"}));
    }

    #[test]
    fn audio_is_omitted_when_empty() {
        let note = NewNote {
            deck_name: "Deck".into(),
            model_name: "Basic".into(),
            fields: FieldMap::new(),
            tags: vec![],
            audio: vec![],
        };
        assert!(add_note_params(&note).get("audio").is_none());
    }
}
