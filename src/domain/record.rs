//! 単語／表現レコード – ドメイン層
//!
//! 生成 API の JSON を厳密にパースし、`WordRecord` へ正規化する。
//! 必須キーが欠けたレスポンスは `ContentGeneration` エラーとして拒否する。

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::pos;
use crate::error::{AnkiVocabError, Result};

/// 任意コレクションが「内容なし」であることを示す番兵
pub const NOT_AVAILABLE: &str = "N/A";

/// 単一値または順序付きリスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// 形（単一 / リスト）を保ったまま各要素を変換する
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> OneOrMany<U> {
        match self {
            OneOrMany::One(item) => OneOrMany::One(f(item)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// 任意コレクション: 要素リスト、または番兵 "N/A"
///
/// "N/A"・空文字・null は番兵。それ以外の単一文字列は 1 要素のリストとして保持する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Collection<T> {
    Items(Vec<T>),
    #[default]
    NotAvailable,
}

impl<T> Collection<T> {
    /// 描画対象の要素を返す。番兵や空リストなら `None`
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Collection::Items(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.items().is_some()
    }
}

/// 番兵かどうか（前後の空白は無視）
pub fn is_sentinel(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text == NOT_AVAILABLE
}

impl<'de, T: Deserialize<'de> + From<String>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Items(Vec<T>),
            Text(String),
            Other(serde_json::Value),
        }

        match Raw::<T>::deserialize(deserializer)? {
            Raw::Items(items) => Ok(Collection::Items(items)),
            Raw::Text(text) if is_sentinel(&text) => Ok(Collection::NotAvailable),
            Raw::Text(text) => Ok(Collection::Items(vec![T::from(text.trim().to_string())])),
            Raw::Other(serde_json::Value::Null) => Ok(Collection::NotAvailable),
            Raw::Other(other) => Err(serde::de::Error::custom(format!(
                "expected a list or \"{}\", got {}",
                NOT_AVAILABLE, other
            ))),
        }
    }
}

/// 熟語・言い回し
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawIdiom")]
pub struct Idiom {
    pub english: String,
    pub japanese: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdiom {
    Text(String),
    Entry {
        #[serde(alias = "phrase", alias = "idiom", alias = "english_text")]
        english: String,
        #[serde(default, alias = "meaning", alias = "japanese_text")]
        japanese: String,
    },
}

impl From<String> for Idiom {
    fn from(english: String) -> Self {
        Idiom {
            english,
            japanese: String::new(),
        }
    }
}

impl From<RawIdiom> for Idiom {
    fn from(raw: RawIdiom) -> Self {
        match raw {
            RawIdiom::Text(english) => Idiom::from(english),
            RawIdiom::Entry { english, japanese } => Idiom { english, japanese },
        }
    }
}

/// 類義語とその違いの説明
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSimilarTerm")]
pub struct SimilarTerm {
    pub term: String,
    pub difference_english: String,
    pub difference_japanese: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSimilarTerm {
    Text(String),
    Entry {
        #[serde(alias = "word")]
        term: String,
        #[serde(default, alias = "difference")]
        difference_english: String,
        #[serde(default)]
        difference_japanese: String,
    },
}

impl From<String> for SimilarTerm {
    fn from(term: String) -> Self {
        SimilarTerm {
            term,
            difference_english: String::new(),
            difference_japanese: String::new(),
        }
    }
}

impl From<RawSimilarTerm> for SimilarTerm {
    fn from(raw: RawSimilarTerm) -> Self {
        match raw {
            RawSimilarTerm::Text(term) => SimilarTerm::from(term),
            RawSimilarTerm::Entry {
                term,
                difference_english,
                difference_japanese,
            } => SimilarTerm {
                term,
                difference_english,
                difference_japanese,
            },
        }
    }
}

/// 派生語（表現モードのみ）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDerivative")]
pub struct Derivative {
    pub word: String,
    pub part_of_speech: String,
    pub meaning: String,
    pub japanese_meaning: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDerivative {
    Text(String),
    Entry {
        word: String,
        #[serde(default)]
        part_of_speech: String,
        #[serde(default)]
        meaning: String,
        #[serde(default)]
        japanese_meaning: String,
    },
}

impl From<String> for Derivative {
    fn from(word: String) -> Self {
        Derivative {
            word,
            part_of_speech: String::new(),
            meaning: String::new(),
            japanese_meaning: String::new(),
        }
    }
}

impl From<RawDerivative> for Derivative {
    fn from(raw: RawDerivative) -> Self {
        match raw {
            RawDerivative::Text(word) => Derivative::from(word),
            RawDerivative::Entry {
                word,
                part_of_speech,
                meaning,
                japanese_meaning,
            } => Derivative {
                word,
                part_of_speech,
                meaning,
                japanese_meaning,
            },
        }
    }
}

/// 見出し語の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKind {
    #[default]
    Word,
    Expression,
}

impl RecordKind {
    /// 見出し語音声ファイル名の接頭辞
    pub fn audio_prefix(self) -> &'static str {
        match self {
            RecordKind::Word => "word",
            RecordKind::Expression => "expression",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Word => "word",
            RecordKind::Expression => "expression",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 生成 API のレスポンス形（キー名は API に合わせる）
#[derive(Debug, Deserialize)]
struct UpstreamRecord {
    japanese_meaning: OneOrMany<String>,
    english_meaning: OneOrMany<String>,
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    idiom: Collection<Idiom>,
    example_sentence: OneOrMany<String>,
    #[serde(default)]
    similar_words: Collection<SimilarTerm>,
    #[serde(default)]
    derivatives: Collection<Derivative>,
}

/// 見出し語についての正規化済み情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub headword: String,
    pub kind: RecordKind,
    pub japanese_meaning: OneOrMany<String>,
    /// 各要素は必ず `[品詞]` で始まる
    pub english_meaning: OneOrMany<String>,
    pub ipa: String,
    pub idioms: Collection<Idiom>,
    pub example_sentences: OneOrMany<String>,
    pub similar_terms: Collection<SimilarTerm>,
    /// 表現モードでのみ `Some`
    pub derivatives: Option<Collection<Derivative>>,
}

impl WordRecord {
    /// 生成 API の JSON 本文をパースして正規化する
    pub fn from_json(headword: &str, kind: RecordKind, body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(AnkiVocabError::ContentGeneration(
                "empty response content".to_string(),
            ));
        }
        let upstream: UpstreamRecord = serde_json::from_str(body).map_err(|e| {
            AnkiVocabError::ContentGeneration(format!("malformed word information: {}", e))
        })?;

        let mut record = WordRecord {
            headword: headword.to_string(),
            kind,
            japanese_meaning: upstream.japanese_meaning,
            english_meaning: upstream.english_meaning,
            ipa: upstream.ipa.unwrap_or_default(),
            idioms: upstream.idiom,
            example_sentences: upstream.example_sentence,
            similar_terms: upstream.similar_words,
            derivatives: match kind {
                RecordKind::Word => None,
                RecordKind::Expression => Some(upstream.derivatives),
            },
        };
        record.tag_english_meanings();
        Ok(record)
    }

    /// 英語定義すべてに品詞タグを付与する
    pub fn tag_english_meanings(&mut self) {
        let meanings = std::mem::take(&mut self.english_meaning);
        self.english_meaning = meanings.map(|m| pos::ensure_tagged(&m));
    }

    /// 指定意味モードの事後条件を適用する
    pub fn apply_specific_meanings(&mut self, meanings: &[String]) {
        self.japanese_meaning = OneOrMany::Many(meanings.to_vec());
        self.idioms = Collection::NotAvailable;
    }

    /// 音声化・描画対象となる例文（空文字と "N/A" を除く）
    pub fn usable_examples(&self) -> Vec<&str> {
        self.example_sentences
            .as_slice()
            .iter()
            .map(|s| s.trim())
            .filter(|s| !is_sentinel(s))
            .collect()
    }
}

impl std::fmt::Display for WordRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list(
            f: &mut std::fmt::Formatter<'_>,
            label: &str,
            items: &[impl AsRef<str>],
        ) -> std::fmt::Result {
            match items {
                [] => writeln!(f, "  {}: {}", label, NOT_AVAILABLE),
                [one] => writeln!(f, "  {}: {}", label, one.as_ref()),
                many => {
                    writeln!(f, "  {}:", label)?;
                    for (i, item) in many.iter().enumerate() {
                        writeln!(f, "    {}. {}", i + 1, item.as_ref())?;
                    }
                    Ok(())
                }
            }
        }

        list(f, "Japanese", self.japanese_meaning.as_slice())?;
        list(f, "English", self.english_meaning.as_slice())?;
        writeln!(
            f,
            "  IPA: {}",
            if self.ipa.is_empty() { NOT_AVAILABLE } else { self.ipa.as_str() }
        )?;
        let idioms: Vec<String> = self
            .idioms
            .items()
            .unwrap_or_default()
            .iter()
            .map(|i| i.english.clone())
            .collect();
        list(f, "Idiom", idioms.as_slice())?;
        list(f, "Example", self.usable_examples().as_slice())?;
        let similar: Vec<&str> = self
            .similar_terms
            .items()
            .unwrap_or_default()
            .iter()
            .map(|s| s.term.as_str())
            .collect();
        list(f, "Similar", similar.as_slice())?;
        if let Some(derivatives) = &self.derivatives {
            let words: Vec<&str> = derivatives
                .items()
                .unwrap_or_default()
                .iter()
                .map(|d| d.word.as_str())
                .collect();
            list(f, "Derivatives", words.as_slice())?;
        }
        Ok(())
    }
}
