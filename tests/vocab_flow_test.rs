mod common;

use anki_vocab::application::AddOptions;
use anki_vocab::domain::RecordKind;
use common::{FakeAnki, service};

fn options(model_name: &str) -> AddOptions {
    AddOptions {
        deck_name: "English Vocabulary".into(),
        model_name: model_name.into(),
        kind: RecordKind::Word,
        meanings: vec![],
        voice: Some("en-US-Neural2-F".into()),
    }
}

/// 生成した音声はすべて保存されるか、添付先フィールドを持つ
#[tokio::test]
async fn test_every_generated_audio_reaches_anki() {
    for (model, fields) in [("Basic", &["Front", "Back"][..]), ("Cloze", &["Text"][..])] {
        let anki = FakeAnki::new(&[(model, fields)]);
        let outcome = service(&anki, false)
            .add("test", &options(model))
            .await
            .unwrap();
        assert_eq!(outcome.audio_files, 3);

        let media = anki.media.lock().unwrap().clone();
        let notes = anki.notes.lock().unwrap();
        let (_, note) = &notes[0];

        for filename in ["word_test.mp3", "example_test_1.mp3", "example_test_2.mp3"] {
            let stored = media.iter().any(|m| m == filename);
            let attached = note
                .audio
                .iter()
                .any(|a| a.filename == filename && !a.target_fields.is_empty());
            assert!(stored ^ attached, "{filename} for {model}: stored={stored} attached={attached}");
        }
        assert!(note.audio.iter().all(|a| !a.target_fields.is_empty()));
    }
}

/// 保存した音声の参照タグは本文にちょうど 1 回だけ現れる
#[tokio::test]
async fn test_inline_audio_is_not_duplicated() {
    let anki = FakeAnki::basic();
    service(&anki, false)
        .add("test", &options("Basic"))
        .await
        .unwrap();

    let notes = anki.notes.lock().unwrap();
    let (_, note) = &notes[0];
    for filename in anki.media.lock().unwrap().iter() {
        let tag = format!("[sound:{filename}]");
        let count: usize = note.fields.values().map(|v| v.matches(&tag).count()).sum();
        assert_eq!(count, 1, "{tag}");
    }
}

#[tokio::test]
async fn test_no_media_is_stored_without_audio() {
    let anki = FakeAnki::basic();
    let mut opts = options("Basic");
    opts.voice = None;
    service(&anki, false).add("test", &opts).await.unwrap();

    assert!(anki.media.lock().unwrap().is_empty());
    assert_eq!(anki.note_count(), 1);
}
