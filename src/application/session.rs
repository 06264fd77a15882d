//! 対話モード（REPL）と、CLI と共用する表示・確認処理
//!
//! 入出力は `BufRead` / `Write` で受け取り、標準入出力以外でもテストできる。

use std::io::{self, BufRead, Write};

use crate::application::vocab_service::{AddOptions, AddOutcome, VocabService};
use crate::domain::{NoteInfo, RecordKind};
use crate::error::Result;

pub const PROMPT: &str = "anki-vocab> ";

const HELP: &str = "\
Commands:
  add <word or expression> [--meanings m1,m2]  generate and add a card
  delete <word or expression>                 delete matching cards (asks first)
  help                                        show this help
  quit | exit                                 leave interactive mode";

/// 対話モードの 1 行コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add {
        headword: String,
        meanings: Vec<String>,
    },
    Delete {
        headword: String,
    },
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// `--meanings a,b` を分割する。空要素は捨てる
pub fn split_meanings(raw: &str) -> Vec<String> {
    raw.split([',', '、'])
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// 1 行をコマンドへ変換する
pub fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    if line.is_empty() {
        return SessionCommand::Empty;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "add" => {
            let (headword, meanings) = match rest.split_once("--meanings") {
                Some((headword, meanings)) => (headword.trim(), split_meanings(meanings)),
                None => (rest, Vec::new()),
            };
            if headword.is_empty() {
                SessionCommand::Invalid("usage: add <word or expression> [--meanings m1,m2]".into())
            } else {
                SessionCommand::Add {
                    headword: headword.to_string(),
                    meanings,
                }
            }
        }
        "delete" | "del" => {
            if rest.is_empty() {
                SessionCommand::Invalid("usage: delete <word or expression>".into())
            } else {
                SessionCommand::Delete {
                    headword: rest.to_string(),
                }
            }
        }
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => SessionCommand::Invalid(format!(
            "unknown command '{}'. Type 'help' for a list of commands.",
            other
        )),
    }
}

/// 対話モードで固定する設定
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub deck_name: String,
    pub model_name: String,
    pub kind: RecordKind,
    pub voice: Option<String>,
}

impl SessionSettings {
    fn add_options(&self, meanings: Vec<String>) -> AddOptions {
        AddOptions {
            deck_name: self.deck_name.clone(),
            model_name: self.model_name.clone(),
            kind: self.kind,
            meanings,
            voice: self.voice.clone(),
        }
    }
}

/// 対話セッション
pub struct Session<'a> {
    service: &'a VocabService,
    settings: SessionSettings,
}

impl<'a> Session<'a> {
    pub fn new(service: &'a VocabService, settings: SessionSettings) -> Self {
        Self { service, settings }
    }

    /// `quit` または入力終端まで 1 行ずつ処理する
    ///
    /// 個々のコマンドのエラーは表示して続行する。
    pub async fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "Interactive mode (deck '{}', note type '{}'). Type 'help' for commands.",
            self.settings.deck_name, self.settings.model_name
        )?;
        let mut lines = input.lines();

        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };

            match parse_command(&line?) {
                SessionCommand::Empty => {}
                SessionCommand::Help => writeln!(out, "{}", HELP)?,
                SessionCommand::Quit => break,
                SessionCommand::Invalid(message) => writeln!(out, "{}", message)?,
                SessionCommand::Add { headword, meanings } => {
                    let options = self.settings.add_options(meanings);
                    if let Err(e) = add_and_report(self.service, &headword, &options, out).await {
                        writeln!(out, "Error: {}", e)?;
                    }
                }
                SessionCommand::Delete { headword } => {
                    if let Err(e) = delete_with_confirmation(
                        self.service,
                        &headword,
                        &self.settings.deck_name,
                        false,
                        &mut lines,
                        out,
                    )
                    .await
                    {
                        writeln!(out, "Error: {}", e)?;
                    }
                }
            }
        }
        writeln!(out, "Bye.")?;
        Ok(())
    }
}

/// カードを追加し、結果を表示する
pub async fn add_and_report<W: Write>(
    service: &VocabService,
    headword: &str,
    options: &AddOptions,
    out: &mut W,
) -> Result<AddOutcome> {
    writeln!(out, "Fetching information for '{}'...", headword)?;
    let outcome = service.add(headword, options).await?;
    write_add_outcome(out, headword, &options.deck_name, &outcome)?;
    Ok(outcome)
}

pub fn write_add_outcome<W: Write>(
    out: &mut W,
    headword: &str,
    deck_name: &str,
    outcome: &AddOutcome,
) -> io::Result<()> {
    writeln!(out, "\nWord information retrieved:")?;
    write!(out, "{}", outcome.record)?;
    if outcome.deck_created {
        writeln!(out, "Created new deck: {}", deck_name)?;
    }
    if let Some(warning) = &outcome.audio_warning {
        writeln!(out, "Warning: Failed to generate audio: {}", warning)?;
        writeln!(out, "Continued without audio.")?;
    }
    if outcome.audio_files > 0 {
        writeln!(
            out,
            "✓ Successfully added '{}' with {} audio file(s) to deck '{}' (Note ID: {})",
            headword, outcome.audio_files, deck_name, outcome.note_id
        )
    } else {
        writeln!(
            out,
            "✓ Successfully added '{}' to deck '{}' (Note ID: {})",
            headword, deck_name, outcome.note_id
        )
    }
}

pub fn write_note_list<W: Write>(out: &mut W, notes: &[NoteInfo]) -> io::Result<()> {
    writeln!(out, "\nFound {} card(s) to delete:", notes.len())?;
    for note in notes {
        writeln!(
            out,
            "  - Note ID {}: {}",
            note.note_id,
            note.preview().unwrap_or_else(|| "Unknown content".to_string())
        )?;
    }
    Ok(())
}

/// 該当ノートを表示し、確認のうえ削除する。戻り値は削除件数
///
/// `assume_yes` が false のとき、`answers` の次の行が `y` の場合のみ削除する。
pub async fn delete_with_confirmation<I, W>(
    service: &VocabService,
    headword: &str,
    deck_name: &str,
    assume_yes: bool,
    answers: &mut I,
    out: &mut W,
) -> Result<usize>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    writeln!(out, "Searching for cards containing '{}'...", headword)?;
    let notes = service.find_notes(headword, deck_name).await?;
    if notes.is_empty() {
        writeln!(
            out,
            "No cards found containing '{}' in deck '{}'",
            headword, deck_name
        )?;
        return Ok(0);
    }
    write_note_list(out, &notes)?;

    if !assume_yes {
        write!(out, "\nDelete {} card(s)? (y/N): ", notes.len())?;
        out.flush()?;
        let answer = answers.next().transpose()?.unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("y") {
            writeln!(out, "Deletion cancelled")?;
            return Ok(0);
        }
    }

    let count = service.delete_notes(&notes).await?;
    writeln!(out, "✓ Successfully deleted {} card(s)", count)?;
    Ok(count)
}
