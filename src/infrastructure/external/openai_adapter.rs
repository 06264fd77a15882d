//! OpenAI クライアントのアダプター実装
//! Application層の ContentGenerator トレイトを実装

use crate::application::traits::ContentGenerator;
use crate::domain::{RecordKind, WordRecord};
use crate::error::Result;
use crate::infrastructure::external::openai::OpenAiClient;
use async_trait::async_trait;

const SYSTEM_PROMPT: &str =
    "You are a helpful language teacher providing vocabulary information in JSON format.";

/// 単語情報生成アダプター
pub struct OpenAiContentGenerator {
    client: OpenAiClient,
}

impl OpenAiContentGenerator {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

/// 生成プロンプトを組み立てる
pub fn build_prompt(headword: &str, kind: RecordKind, meanings: &[String]) -> String {
    let mut prompt = format!(
        r#"Please provide the following information for the English {kind} "{headword}":
1. Japanese meaning (日本語の意味、複数可、頻出順に)
2. English definition (英語の定義、複数可、頻出順に). Start every definition with its part of speech in brackets, e.g. "[noun] ...", "[verb] ...", "[adjective] ...", "[adverb] ...".
3. IPA pronunciation
4. Common idioms or phrases as a list of objects with "english" and "japanese" keys (if none, write "N/A")
5. Example sentences (at least one, if possible 2-3)
6. Similar words as a list of objects with "word", "difference" (in English) and "difference_japanese" keys (if none, write "N/A")
"#
    );
    if kind == RecordKind::Expression {
        prompt.push_str(
            "7. Derivatives as a list of objects with \"word\", \"part_of_speech\", \"meaning\" and \"japanese_meaning\" keys (if none, write \"N/A\")\n",
        );
    }
    if !meanings.is_empty() {
        prompt.push_str(&format!(
            "\nFocus only on these Japanese meanings: {}. Definitions and example sentences must match them.\n",
            meanings.join(", ")
        ));
    }

    prompt.push_str(
        "\nFormat the response as JSON with these exact keys:\n- japanese_meaning\n- english_meaning\n- ipa\n- idiom\n- example_sentence\n- similar_words\n",
    );
    if kind == RecordKind::Expression {
        prompt.push_str("- derivatives\n");
    }
    prompt
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    async fn fetch(&self, headword: &str, kind: RecordKind) -> Result<WordRecord> {
        let body = self
            .client
            .chat_json(SYSTEM_PROMPT, &build_prompt(headword, kind, &[]))
            .await?;
        WordRecord::from_json(headword, kind, &body)
    }

    async fn fetch_with_meanings(
        &self,
        headword: &str,
        kind: RecordKind,
        meanings: &[String],
    ) -> Result<WordRecord> {
        let body = self
            .client
            .chat_json(SYSTEM_PROMPT, &build_prompt(headword, kind, meanings))
            .await?;
        let mut record = WordRecord::from_json(headword, kind, &body)?;
        record.apply_specific_meanings(meanings);
        Ok(record)
    }
}
