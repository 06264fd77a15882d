//! Anki ノートの入出力型

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::audio::AudioAsset;
use crate::domain::card::FieldMap;

/// 削除確認で表示するプレビューの最大文字数
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteField {
    pub value: String,
    pub order: u32,
}

/// `notesInfo` の 1 件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub note_id: u64,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fields: HashMap<String, NoteField>,
}

impl NoteInfo {
    /// フィールド順で最初の空でない値（50 文字で切り詰め）
    pub fn preview(&self) -> Option<String> {
        let mut fields: Vec<&NoteField> = self.fields.values().collect();
        fields.sort_by_key(|f| f.order);
        let value = fields
            .into_iter()
            .map(|f| f.value.trim())
            .find(|v| !v.is_empty())?;

        if value.chars().count() > PREVIEW_CHARS {
            let cut: String = value.chars().take(PREVIEW_CHARS).collect();
            Some(format!("{}...", cut))
        } else {
            Some(value.to_string())
        }
    }
}

/// `addNote` に渡すノート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: FieldMap,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<AudioAsset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(fields: &[(&str, &str, u32)]) -> NoteInfo {
        NoteInfo {
            note_id: 1,
            model_name: "Basic".into(),
            tags: vec![],
            fields: fields
                .iter()
                .map(|(name, value, order)| {
                    (
                        name.to_string(),
                        NoteField {
                            value: value.to_string(),
                            order: *order,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn preview_uses_first_non_empty_field_in_order() {
        let n = note(&[("Back", "meaning", 1), ("Front", "", 0)]);
        assert_eq!(n.preview().as_deref(), Some("meaning"));
    }

    #[test]
    fn long_preview_is_truncated() {
        let long = "あ".repeat(60);
        let n = note(&[("Front", &long, 0)]);
        let preview = n.preview().unwrap();
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn empty_note_has_no_preview() {
        assert_eq!(note(&[("Front", " ", 0)]).preview(), None);
    }

    #[test]
    fn deserializes_notes_info_entry() {
        let json = r#"{"noteId": 42, "modelName": "Basic", "tags": ["english"],
            "fields": {"Front": {"value": "run", "order": 0}}, "cards": [1]}"#;
        let info: NoteInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.note_id, 42);
        assert_eq!(info.preview().as_deref(), Some("run"));
    }
}
