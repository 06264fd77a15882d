//! 音声アセットとファイル名規約
//!
//! ファイル名（`word_<key>.mp3` / `example_<key>_<n>.mp3`）が音声と本文を
//! 結びつける唯一のキーになる。

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::domain::record::RecordKind;

/// Anki へ添付する音声 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioAsset {
    pub filename: String,
    /// base64 エンコード済み MP3
    pub data: String,
    /// サービス側で `[sound:..]` を追記するフィールド
    #[serde(rename = "fields")]
    pub target_fields: Vec<String>,
}

impl AudioAsset {
    pub fn new(filename: String, audio: &[u8]) -> Self {
        Self {
            filename,
            data: STANDARD.encode(audio),
            target_fields: Vec::new(),
        }
    }

    /// 見出し語の音声
    pub fn headword(headword: &str, kind: RecordKind, audio: &[u8]) -> Self {
        Self::new(headword_filename(headword, kind), audio)
    }

    /// `index` 番目（1 始まり）の例文音声
    pub fn example(headword: &str, index: usize, audio: &[u8]) -> Self {
        Self::new(example_filename(headword, index), audio)
    }

    /// フィールド本文へ埋め込む参照タグ
    pub fn sound_tag(&self) -> String {
        format!("[sound:{}]", self.filename)
    }
}

/// 空白・`/`・`\` を `_` に置き換えたファイル名用キー
pub fn sanitize_key(headword: &str) -> String {
    headword.replace([' ', '/', '\\'], "_")
}

pub fn headword_prefix(key: &str, kind: RecordKind) -> String {
    format!("{}_{}", kind.audio_prefix(), key)
}

pub fn example_prefix(key: &str) -> String {
    format!("example_{}_", key)
}

pub fn headword_filename(headword: &str, kind: RecordKind) -> String {
    format!("{}.mp3", headword_prefix(&sanitize_key(headword), kind))
}

pub fn example_filename(headword: &str, index: usize) -> String {
    format!("{}{}.mp3", example_prefix(&sanitize_key(headword)), index)
}
