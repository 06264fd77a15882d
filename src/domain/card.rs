//! カード組み立てエンジン – ドメイン層
//!
//! `WordRecord` と音声アセット、ノートタイプのフィールド名一覧から
//! フィールド名 → HTML の対応表（`FieldMap`）を決定的に作る。
//! どの入力の組み合わせでも失敗しない（全域関数）。

use std::collections::BTreeMap;

use crate::domain::audio::{AudioAsset, example_prefix, headword_prefix, sanitize_key};
use crate::domain::record::{OneOrMany, WordRecord};

/// フィールド名 → HTML 本文
pub type FieldMap = BTreeMap<String, String>;

const FRONT_TOKENS: &[&str] = &["front", "question", "text1", "expression", "word"];
const BACK_TOKENS: &[&str] = &["back", "answer", "text2", "meaning", "definition"];

const LIST_OPEN: &str = r#"<ul style="margin: 5px 0; padding-left: 20px;">"#;
const SECTION_OPEN: &str = r#"<div style="margin-bottom: 15px;">"#;

/// 表面・裏面に割り当てるフィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRoles {
    pub front: String,
    pub back: String,
}

impl FieldRoles {
    /// フィールド名から表面・裏面の役割を決める
    ///
    /// 大文字小文字を無視した部分一致で、役割ごとに最初に一致したものを採用する。
    /// 一致しなければ位置で決める（表面 = 先頭、裏面 = 2 番目、無ければ表面と共用）。
    pub fn resolve(field_names: &[String]) -> Option<Self> {
        let first = field_names.first()?;

        let front = field_names
            .iter()
            .find(|name| has_token(name, FRONT_TOKENS))
            .unwrap_or(first);
        let back = field_names
            .iter()
            .filter(|name| *name != front)
            .find(|name| has_token(name, BACK_TOKENS))
            .or_else(|| field_names.get(1))
            .unwrap_or(front);

        Some(Self {
            front: front.clone(),
            back: back.clone(),
        })
    }

    /// 表裏が同じフィールド（1 フィールドのノートタイプなど）
    pub fn is_single(&self) -> bool {
        self.front == self.back
    }
}

fn has_token(name: &str, tokens: &[&str]) -> bool {
    let lower = name.to_lowercase();
    tokens.iter().any(|t| lower.contains(t))
}

/// カード本文を組み立てる
pub fn assemble(
    headword: &str,
    record: &WordRecord,
    field_names: &[String],
    audio: &[AudioAsset],
) -> FieldMap {
    let mut fields = FieldMap::new();
    let Some(roles) = FieldRoles::resolve(field_names) else {
        return fields;
    };

    let key = sanitize_key(headword);
    let front = render_front(headword, record, &key, audio);
    let back = render_back(record, &key, audio);

    if roles.is_single() {
        fields.insert(roles.front, format!("{}\n{}", front, back));
    } else {
        fields.insert(roles.front, front);
        fields.insert(roles.back, back);
    }
    fields
}

/// 音声アセットの添付先フィールドを決める
///
/// 本文に `[sound:..]` が既に埋め込まれている音声は添付先なし。
/// これらは呼び出し側でメディアとして個別に保存する（`addNote` は添付先の無い音声を保存しない）。
/// 埋め込まれなかった音声は裏面フィールドへ追記させ、取りこぼさない。
pub fn bind_audio(audio: &mut [AudioAsset], fields: &FieldMap, field_names: &[String]) {
    let Some(roles) = FieldRoles::resolve(field_names) else {
        return;
    };
    for asset in audio.iter_mut() {
        let tag = asset.sound_tag();
        asset.target_fields = if fields.values().any(|content| content.contains(&tag)) {
            Vec::new()
        } else {
            vec![roles.back.clone()]
        };
    }
}

fn render_front(headword: &str, record: &WordRecord, key: &str, audio: &[AudioAsset]) -> String {
    let prefix = headword_prefix(key, record.kind);
    let sound = audio
        .iter()
        .find(|a| is_headword_audio(&a.filename, &prefix))
        .map(|a| format!(" {}", a.sound_tag()))
        .unwrap_or_default();

    format!(
        r#"<div style="font-size: 24px; font-weight: bold;">{headword}{sound}</div>
<div><span class="ipa" style="font-size: 18px; color: #666;">{ipa}</span></div>"#,
        ipa = record.ipa
    )
}

fn render_back(record: &WordRecord, key: &str, audio: &[AudioAsset]) -> String {
    let mut back = String::new();

    back.push_str(&section("English", &render_one_or_many(&record.english_meaning)));

    if let Some(examples) = render_examples(record, key, audio) {
        back.push_str(&format!(
            r#"<div style="margin-bottom: 15px; margin-top: 20px; padding: 10px; background-color: #f0f0f0; border-radius: 5px;"><strong>Example:</strong> {}</div>"#,
            examples
        ));
    }

    back.push_str(r#"<hr style="margin: 20px 0; border: 1px solid #ccc;">"#);

    back.push_str(&section("Japanese", &render_one_or_many(&record.japanese_meaning)));

    if let Some(idioms) = record.idioms.items() {
        let items = idioms
            .iter()
            .map(|i| with_sub_bullets(&i.english, &[i.japanese.as_str()]));
        back.push_str(&section("Idiom/Phrase", &render_list(items)));
    }

    if let Some(derivatives) = record.derivatives.as_ref().and_then(|d| d.items()) {
        let items = derivatives.iter().map(|d| {
            let mut head = format!("<b>{}</b>", d.word);
            if !d.part_of_speech.is_empty() {
                head.push_str(&format!(" ({})", d.part_of_speech));
            }
            if !d.meaning.is_empty() {
                head.push_str(&format!(": {}", d.meaning));
            }
            with_sub_bullets(&head, &[d.japanese_meaning.as_str()])
        });
        back.push_str(&section("Derivatives", &render_list(items)));
    }

    if let Some(similar) = record.similar_terms.items() {
        let items = similar.iter().map(|s| {
            with_sub_bullets(
                &format!("<b>{}</b>", s.term),
                &[s.difference_english.as_str(), s.difference_japanese.as_str()],
            )
        });
        back.push_str(&section("Similar Words", &render_list(items)));
    }

    back
}

/// 例文と例文音声を位置で対応づけて描画する
///
/// 例文音声はファイル名の辞書順に並べ、N 番目の例文に N 番目の音声を付ける。
fn render_examples(record: &WordRecord, key: &str, audio: &[AudioAsset]) -> Option<String> {
    let examples = record.usable_examples();
    if examples.is_empty() {
        return None;
    }

    let prefix = example_prefix(key);
    let mut example_audio: Vec<&AudioAsset> = audio
        .iter()
        .filter(|a| is_example_audio(&a.filename, &prefix))
        .collect();
    example_audio.sort_by(|a, b| a.filename.cmp(&b.filename));

    let mut rendered = examples.iter().enumerate().map(|(i, example)| {
        match example_audio.get(i) {
            Some(asset) => format!("{} {}", example, asset.sound_tag()),
            None => example.to_string(),
        }
    });

    if record.example_sentences.is_many() {
        Some(render_list(rendered))
    } else {
        rendered.next()
    }
}

/// `<prefix>.<ext>`
fn is_headword_audio(filename: &str, prefix: &str) -> bool {
    filename
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// `<prefix><番号>.<ext>`
fn is_example_audio(filename: &str, prefix: &str) -> bool {
    filename
        .strip_prefix(prefix)
        .and_then(|rest| rest.split_once('.'))
        .is_some_and(|(index, _)| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn section(label: &str, body: &str) -> String {
    format!("{SECTION_OPEN}<strong>{label}:</strong> {body}</div>")
}

fn render_one_or_many(value: &OneOrMany<String>) -> String {
    match value {
        OneOrMany::One(text) => text.clone(),
        OneOrMany::Many(items) => render_list(items.iter()),
    }
}

fn render_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let body: String = items
        .into_iter()
        .map(|item| format!("<li>{}</li>", item.as_ref()))
        .collect();
    format!("{LIST_OPEN}{body}</ul>")
}

/// 見出し行と、空でない補足説明の入れ子リスト
fn with_sub_bullets(head: &str, notes: &[&str]) -> String {
    let notes: Vec<&str> = notes.iter().copied().filter(|n| !n.trim().is_empty()).collect();
    if notes.is_empty() {
        head.to_string()
    } else {
        format!("{}{}", head, render_list(notes))
    }
}

// === Unit tests ==========================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn roles_match_conventional_names() {
        let roles = FieldRoles::resolve(&names(&["Front", "Back"])).unwrap();
        assert_eq!(roles.front, "Front");
        assert_eq!(roles.back, "Back");

        let roles = FieldRoles::resolve(&names(&["Meaning", "Notes", "Word"])).unwrap();
        assert_eq!(roles.front, "Word");
        assert_eq!(roles.back, "Meaning");
    }

    /// 一致しないフィールド名は位置で割り当てる
    #[test]
    fn roles_fall_back_to_position() {
        let roles = FieldRoles::resolve(&names(&["Foo", "Bar", "Baz"])).unwrap();
        assert_eq!(roles.front, "Foo");
        assert_eq!(roles.back, "Bar");
    }

    #[test]
    fn first_match_wins_per_role() {
        let roles =
            FieldRoles::resolve(&names(&["Question", "Front", "Answer", "Back"])).unwrap();
        assert_eq!(roles.front, "Question");
        assert_eq!(roles.back, "Answer");
    }

    #[test]
    fn single_field_is_shared() {
        let roles = FieldRoles::resolve(&names(&["Text"])).unwrap();
        assert!(roles.is_single());
    }

    #[test]
    fn empty_field_list_has_no_roles() {
        assert!(FieldRoles::resolve(&[]).is_none());
    }

    #[test]
    fn list_items_are_wrapped() {
        assert_eq!(
            render_list(["a", "b"]),
            format!("{LIST_OPEN}<li>a</li><li>b</li></ul>")
        );
    }

    #[test]
    fn audio_filenames_must_match_exactly() {
        assert!(is_headword_audio("word_test.mp3", "word_test"));
        assert!(!is_headword_audio("word_tester.mp3", "word_test"));
        assert!(is_example_audio("example_test_12.mp3", "example_test_"));
        assert!(!is_example_audio("example_test_extra_1.mp3", "example_test_"));
    }

    #[test]
    fn blank_notes_produce_no_sub_list() {
        assert_eq!(with_sub_bullets("run into", &[""]), "run into");
        assert!(with_sub_bullets("run into", &["偶然会う"]).contains("<li>偶然会う</li>"));
    }
}
