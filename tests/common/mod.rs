//! 結合テスト用のインメモリ実装
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anki_vocab::application::traits::{ContentGenerator, FlashcardService, SpeechSynthesizer};
use anki_vocab::application::VocabService;
use anki_vocab::domain::{
    AudioAsset, Collection, NewNote, NoteField, NoteInfo, OneOrMany, RecordKind, WordRecord,
};
use anki_vocab::{AnkiVocabError, Result};
use async_trait::async_trait;

// CI環境で実行可能なテストを示すマーカー
#[cfg(feature = "ci-test")]
pub const CI_TEST_MODE: bool = true;

#[cfg(not(feature = "ci-test"))]
pub const CI_TEST_MODE: bool = false;

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 最小限の単語レコード
pub fn record(headword: &str) -> WordRecord {
    WordRecord {
        headword: headword.to_string(),
        kind: RecordKind::Word,
        japanese_meaning: OneOrMany::One("テスト".into()),
        english_meaning: OneOrMany::Many(vec!["[noun] a procedure to check quality".into()]),
        ipa: "/test/".into(),
        idioms: Collection::NotAvailable,
        example_sentences: OneOrMany::Many(vec![
            "We ran a test.".into(),
            "The test failed.".into(),
        ]),
        similar_terms: Collection::NotAvailable,
        derivatives: None,
    }
}

pub struct FakeGenerator {
    pub record: WordRecord,
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn fetch(&self, headword: &str, kind: RecordKind) -> Result<WordRecord> {
        let mut record = self.record.clone();
        record.headword = headword.to_string();
        record.kind = kind;
        Ok(record)
    }

    async fn fetch_with_meanings(
        &self,
        headword: &str,
        kind: RecordKind,
        meanings: &[String],
    ) -> Result<WordRecord> {
        let mut record = self.fetch(headword, kind).await?;
        record.apply_specific_meanings(meanings);
        Ok(record)
    }
}

/// テキストをそのままバイト列として返す
#[derive(Default)]
pub struct FakeSynthesizer {
    pub fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, _voice: &str, _speed: f32) -> Result<Vec<u8>> {
        if self.fail {
            return Err(AnkiVocabError::SpeechSynthesis("no audio stream returned".into()));
        }
        Ok(text.as_bytes().to_vec())
    }
}

/// AnkiConnect のインメモリ版
#[derive(Clone)]
pub struct FakeAnki {
    pub models: HashMap<String, Vec<String>>,
    pub decks: Arc<Mutex<Vec<String>>>,
    pub notes: Arc<Mutex<Vec<(u64, NewNote)>>>,
    /// `storeMediaFile` で保存されたファイル名
    pub media: Arc<Mutex<Vec<String>>>,
}

impl FakeAnki {
    pub fn new(models: &[(&str, &[&str])]) -> Self {
        Self {
            models: models
                .iter()
                .map(|(name, fields)| (name.to_string(), names(fields)))
                .collect(),
            decks: Arc::new(Mutex::new(vec!["Default".to_string()])),
            notes: Arc::new(Mutex::new(Vec::new())),
            media: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn basic() -> Self {
        Self::new(&[("Basic", &["Front", "Back"])])
    }

    pub fn note_count(&self) -> usize {
        self.notes.lock().unwrap().len()
    }
}

#[async_trait]
impl FlashcardService for FakeAnki {
    async fn model_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn model_field_names(&self, model_name: &str) -> Result<Vec<String>> {
        self.models
            .get(model_name)
            .cloned()
            .ok_or_else(|| AnkiVocabError::FlashcardService("model was not found".into()))
    }

    async fn deck_names(&self) -> Result<Vec<String>> {
        Ok(self.decks.lock().unwrap().clone())
    }

    async fn create_deck(&self, deck_name: &str) -> Result<u64> {
        let mut decks = self.decks.lock().unwrap();
        decks.push(deck_name.to_string());
        Ok(decks.len() as u64)
    }

    /// `"<語>" deck:"<デッキ>"` を素朴に解釈する
    async fn find_notes(&self, query: &str) -> Result<Vec<u64>> {
        let mut parts = query.split('"').filter(|p| !p.trim().is_empty());
        let needle = parts.next().unwrap_or_default().to_string();
        let deck = parts.nth(1).unwrap_or_default().to_string();
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, n)| n.deck_name == deck && n.fields.values().any(|v| v.contains(&needle)))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn notes_info(&self, note_ids: &[u64]) -> Result<Vec<NoteInfo>> {
        let notes = self.notes.lock().unwrap();
        Ok(notes
            .iter()
            .filter(|(id, _)| note_ids.contains(id))
            .map(|(id, note)| NoteInfo {
                note_id: *id,
                model_name: note.model_name.clone(),
                tags: note.tags.clone(),
                fields: note
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, (name, value))| {
                        (
                            name.clone(),
                            NoteField {
                                value: value.clone(),
                                order: i as u32,
                            },
                        )
                    })
                    .collect(),
            })
            .collect())
    }

    async fn delete_notes(&self, note_ids: &[u64]) -> Result<()> {
        self.notes
            .lock()
            .unwrap()
            .retain(|(id, _)| !note_ids.contains(id));
        Ok(())
    }

    async fn store_media_file(&self, asset: &AudioAsset) -> Result<String> {
        self.media.lock().unwrap().push(asset.filename.clone());
        Ok(asset.filename.clone())
    }

    async fn add_note(&self, note: &NewNote) -> Result<u64> {
        let mut notes = self.notes.lock().unwrap();
        let id = 1_000 + notes.len() as u64;
        notes.push((id, note.clone()));
        Ok(id)
    }
}

pub fn service(anki: &FakeAnki, fail_audio: bool) -> VocabService {
    VocabService::new(
        Box::new(FakeGenerator {
            record: record("test"),
        }),
        Box::new(FakeSynthesizer { fail: fail_audio }),
        Box::new(anki.clone()),
    )
}
