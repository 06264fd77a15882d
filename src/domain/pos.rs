//! 英語定義への品詞タグ付け
//!
//! 生成 API がタグを省略しても、全ての英語定義が `[品詞] 定義` の形になるよう
//! 表層的な手がかりから品詞を推定する。

const ADJECTIVE_CUES: &[&str] = &[
    "having ",
    "being ",
    "relating to",
    "related to",
    "characterized by",
    "characterised by",
    "full of",
    "capable of",
    "able to",
    "marked by",
    "showing ",
    "causing ",
    "made of",
];

const NOUN_CUES: &[&str] = &["act of", "process of", "state of", "quality of"];

/// 品詞タグとして認める語（`phrasal verb` など複合語を含む）
const KNOWN_TAGS: &[&str] = &[
    "noun",
    "verb",
    "adjective",
    "adverb",
    "definition",
    "phrasal verb",
    "transitive verb",
    "intransitive verb",
    "auxiliary verb",
    "modal verb",
    "preposition",
    "conjunction",
    "pronoun",
    "determiner",
    "interjection",
    "idiom",
    "phrase",
];

/// 短い単文とみなす語数の上限
const SHORT_DEFINITION_WORDS: usize = 4;

/// 先頭の `[...]` の中身と、その後ろの本文
fn split_bracket(definition: &str) -> Option<(&str, &str)> {
    let rest = definition.trim_start().strip_prefix('[')?;
    let (label, body) = rest.split_once(']')?;
    Some((label.trim(), body.trim_start()))
}

/// 先頭が既知の品詞の `[...]` で始まっていればタグ付き
pub fn has_tag(definition: &str) -> bool {
    split_bracket(definition).is_some_and(|(label, _)| {
        let label = label.to_lowercase();
        KNOWN_TAGS.contains(&label.as_str())
    })
}

/// 定義文から品詞を推定する。順序付きの規則で最初に当たったものを返す
pub fn infer_tag(definition: &str) -> &'static str {
    let lower = definition.trim().to_lowercase();

    if lower.starts_with("to ") {
        return "verb";
    }
    if ["a ", "an ", "the "].iter().any(|a| lower.starts_with(a)) {
        return "noun";
    }
    if ADJECTIVE_CUES.iter().any(|cue| lower.starts_with(cue)) {
        return "adjective";
    }
    if NOUN_CUES.iter().any(|cue| lower.contains(cue)) {
        return "noun";
    }

    let last = lower
        .split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .unwrap_or_default();
    if last.len() > 2 && last.ends_with("ly") {
        return "adverb";
    }

    let single_clause = !lower.contains([',', ';', ':']);
    if single_clause && lower.split_whitespace().count() <= SHORT_DEFINITION_WORDS {
        return "adjective";
    }
    "definition"
}

/// タグが無ければ推定タグを付けて返す
pub fn ensure_tagged(definition: &str) -> String {
    let trimmed = definition.trim();
    if has_tag(trimmed) {
        return trimmed.to_string();
    }
    // `[informal]` などの注記は残し、推定は本文で行う
    let body = split_bracket(trimmed)
        .map(|(_, body)| body)
        .unwrap_or(trimmed);
    format!("[{}] {}", infer_tag(body), trimmed)
}
