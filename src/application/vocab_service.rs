//! 単語カードの追加・削除を管理するサービス
//!
//! # 責任
//! - 単語情報の生成 → 音声合成 → カード組み立て → Anki 追加の順序付け
//! - 音声合成の失敗を「音声なしで続行」に格下げ
//! - 削除対象ノートの検索と削除

use crate::application::traits::{ContentGenerator, FlashcardService, SpeechSynthesizer};
use crate::domain::{
    AudioAsset, FieldMap, NewNote, NoteInfo, RecordKind, WordRecord, assemble, bind_audio,
};
use crate::error::{AnkiVocabError, Result};
use crate::utils::profiling;

/// 見出し語の読み上げ速度（聞き取りやすさ優先で少し遅く）
pub const HEADWORD_SPEED: f32 = 0.9;
/// 例文の読み上げ速度
pub const EXAMPLE_SPEED: f32 = 1.0;

const BASE_TAGS: &[&str] = &["english", "vocabulary", "ai-generated"];

/// 追加オプション
#[derive(Clone, Debug)]
pub struct AddOptions {
    pub deck_name: String,
    pub model_name: String,
    pub kind: RecordKind,
    /// 空でなければ指定意味モード
    pub meanings: Vec<String>,
    /// `None` なら音声を生成しない
    pub voice: Option<String>,
}

/// 追加結果
#[derive(Debug)]
pub struct AddOutcome {
    pub note_id: u64,
    pub record: WordRecord,
    pub fields: FieldMap,
    pub audio_files: usize,
    /// 音声生成に失敗して音声なしで追加した場合の理由
    pub audio_warning: Option<String>,
    pub deck_created: bool,
}

/// 単語カードサービス
pub struct VocabService {
    generator: Box<dyn ContentGenerator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    flashcards: Box<dyn FlashcardService>,
}

impl VocabService {
    pub fn new(
        generator: Box<dyn ContentGenerator>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        flashcards: Box<dyn FlashcardService>,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            flashcards,
        }
    }

    /// ノートタイプを検証し、そのフィールド名を返す
    pub async fn field_names(&self, model_name: &str) -> Result<Vec<String>> {
        let models = self.flashcards.model_names().await?;
        if !models.iter().any(|m| m == model_name) {
            return Err(AnkiVocabError::NoteTypeNotFound {
                name: model_name.to_string(),
                available: models,
            });
        }

        let field_names = self.flashcards.model_field_names(model_name).await?;
        if field_names.is_empty() {
            return Err(AnkiVocabError::FlashcardService(format!(
                "note type '{}' has no fields",
                model_name
            )));
        }
        Ok(field_names)
    }

    /// 単語情報を生成してカードを追加する
    pub async fn add(&self, headword: &str, options: &AddOptions) -> Result<AddOutcome> {
        let headword = headword.trim();
        if headword.is_empty() {
            return Err("headword must not be empty".into());
        }
        let overall_timer = profiling::Timer::start("add.total");

        let field_names = self.field_names(&options.model_name).await?;
        log::info!(
            "using note type '{}' with fields: {}",
            options.model_name,
            field_names.join(", ")
        );

        let generate_timer = profiling::Timer::start("add.generate");
        let record = if options.meanings.is_empty() {
            self.generator.fetch(headword, options.kind).await?
        } else {
            self.generator
                .fetch_with_meanings(headword, options.kind, &options.meanings)
                .await?
        };
        generate_timer.log();

        let (mut audio, audio_warning) = match &options.voice {
            None => (Vec::new(), None),
            Some(voice) => match self.generate_audio(headword, &record, voice).await {
                Ok(audio) => (audio, None),
                Err(e) => {
                    log::warn!("audio generation failed, continuing without audio: {}", e);
                    (Vec::new(), Some(e.to_string()))
                }
            },
        };

        let fields = assemble(headword, &record, &field_names, &audio);
        bind_audio(&mut audio, &fields, &field_names);
        for (name, content) in &fields {
            if content.contains("[sound:") {
                log::debug!("field '{}' contains audio tags", name);
            }
        }

        let deck_created = self.flashcards.ensure_deck(&options.deck_name).await?;
        if deck_created {
            log::info!("created deck '{}'", options.deck_name);
        }

        let audio_files = audio.len();
        let (inline, attached): (Vec<AudioAsset>, Vec<AudioAsset>) =
            audio.into_iter().partition(|a| a.target_fields.is_empty());
        for asset in &inline {
            let stored = self.flashcards.store_media_file(asset).await?;
            log::debug!("stored media file '{}'", stored);
        }

        let note = NewNote {
            deck_name: options.deck_name.clone(),
            model_name: options.model_name.clone(),
            fields: fields.clone(),
            tags: tags_for(options.kind),
            audio: attached,
        };
        let add_timer = profiling::Timer::start("add.anki");
        let note_id = self.flashcards.add_note(&note).await?;
        add_timer.log();

        if profiling::enabled() {
            overall_timer.log_with(&format!("audio_files={}", audio_files));
        } else {
            overall_timer.log();
        }

        Ok(AddOutcome {
            note_id,
            record,
            fields,
            audio_files,
            audio_warning,
            deck_created,
        })
    }

    /// 見出し語 1 件 + 例文ごとに 1 件の音声を順に生成する
    pub async fn generate_audio(
        &self,
        headword: &str,
        record: &WordRecord,
        voice: &str,
    ) -> Result<Vec<AudioAsset>> {
        let timer = profiling::Timer::start("add.audio");
        let mut assets = Vec::new();

        let bytes = self
            .synthesizer
            .synthesize(headword, voice, HEADWORD_SPEED)
            .await?;
        assets.push(AudioAsset::headword(headword, record.kind, &bytes));

        for (i, sentence) in record.usable_examples().into_iter().enumerate() {
            let bytes = self
                .synthesizer
                .synthesize(sentence, voice, EXAMPLE_SPEED)
                .await?;
            assets.push(AudioAsset::example(headword, i + 1, &bytes));
        }

        timer.log();
        Ok(assets)
    }

    /// デッキ内で見出し語を含むノートを探す
    pub async fn find_notes(&self, headword: &str, deck_name: &str) -> Result<Vec<NoteInfo>> {
        let query = search_query(headword, deck_name);
        log::debug!("findNotes query: {}", query);
        let ids = self.flashcards.find_notes(&query).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.flashcards.notes_info(&ids).await
    }

    /// ノートを削除し、削除件数を返す
    pub async fn delete_notes(&self, notes: &[NoteInfo]) -> Result<usize> {
        let ids: Vec<u64> = notes.iter().map(|n| n.note_id).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        self.flashcards.delete_notes(&ids).await?;
        Ok(ids.len())
    }
}

/// `"<見出し語>" deck:"<デッキ>"` 形式の検索クエリ
pub fn search_query(headword: &str, deck_name: &str) -> String {
    format!(
        "\"{}\" deck:\"{}\"",
        headword.replace('"', "\\\""),
        deck_name.replace('"', "\\\"")
    )
}

fn tags_for(kind: RecordKind) -> Vec<String> {
    let mut tags: Vec<String> = BASE_TAGS.iter().map(|t| t.to_string()).collect();
    if kind == RecordKind::Expression {
        tags.push(kind.label().to_string());
    }
    tags
}
