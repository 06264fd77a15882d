//! Application層の抽象化トレイト定義
//! 外部サービスを抽象化し、テスト可能な構造を提供します

use crate::domain::{AudioAsset, NewNote, NoteInfo, RecordKind, WordRecord};
use crate::error::Result;
use async_trait::async_trait;

/// 単語情報の生成
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// 見出し語の情報を生成する
    async fn fetch(&self, headword: &str, kind: RecordKind) -> Result<WordRecord>;

    /// 指定した日本語の意味に絞って生成する
    ///
    /// 戻り値の `japanese_meaning` は `meanings` そのもの、`idioms` は番兵になる。
    async fn fetch_with_meanings(
        &self,
        headword: &str,
        kind: RecordKind,
        meanings: &[String],
    ) -> Result<WordRecord>;
}

/// 音声合成
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// `speed` は 1.0 が標準速度。MP3 のバイト列を返す
    async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>>;
}

/// フラッシュカードサービス（AnkiConnect）
#[async_trait]
pub trait FlashcardService: Send + Sync {
    async fn model_names(&self) -> Result<Vec<String>>;

    async fn model_field_names(&self, model_name: &str) -> Result<Vec<String>>;

    async fn deck_names(&self) -> Result<Vec<String>>;

    async fn create_deck(&self, deck_name: &str) -> Result<u64>;

    async fn find_notes(&self, query: &str) -> Result<Vec<u64>>;

    async fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>>;

    async fn delete_notes(&self, note_ids: &[u64]) -> Result<()>;

    /// メディアフォルダへ音声を保存する。保存されたファイル名を返す
    async fn store_media_file(&self, asset: &AudioAsset) -> Result<String>;

    async fn add_note(&self, note: &NewNote) -> Result<u64>;

    /// デッキが無ければ作成する。戻り値 true=作成した
    async fn ensure_deck(&self, deck_name: &str) -> Result<bool> {
        let decks = self.deck_names().await?;
        if decks.iter().any(|d| d == deck_name) {
            return Ok(false);
        }
        self.create_deck(deck_name).await?;
        Ok(true)
    }
}
