use clap::Parser;

use crate::application::session::split_meanings;
use crate::domain::RecordKind;

#[derive(Parser, Debug)]
#[command(
    name = "anki_vocab",
    author,
    version,
    about = "Add English vocabulary to Anki with AI-generated definitions, or delete existing cards"
)]
pub struct Cli {
    /// 追加・削除する単語または表現（複数語はスペースで連結）
    pub word: Vec<String>,

    /// デッキ名（設定を上書き）
    #[arg(long)]
    pub deck: Option<String>,

    /// ノートタイプ名（設定を上書き）
    #[arg(long)]
    pub model: Option<String>,

    /// 音声を生成しない
    #[arg(long, default_value_t = false)]
    pub no_audio: bool,

    /// 音声名（例: en-US-Neural2-F）
    #[arg(long)]
    pub voice: Option<String>,

    /// 日本語の意味を指定（カンマ区切り）
    #[arg(long)]
    pub meanings: Option<String>,

    /// 熟語・句動詞などの表現として扱う（派生語を含める）
    #[arg(long, default_value_t = false)]
    pub expression: bool,

    /// 追加ではなく該当カードを削除する
    #[arg(long, default_value_t = false)]
    pub delete: bool,

    /// 削除の確認を省略する
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,

    /// 対話モード
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// 設定ファイルの場所を表示して終了
    #[arg(long, default_value_t = false)]
    pub config: bool,
}

impl Cli {
    /// 位置引数を 1 つの見出し語にまとめる
    pub fn headword(&self) -> Option<String> {
        let joined = self.word.join(" ");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn kind(&self) -> RecordKind {
        if self.expression {
            RecordKind::Expression
        } else {
            RecordKind::Word
        }
    }

    pub fn meaning_list(&self) -> Vec<String> {
        self.meanings
            .as_deref()
            .map(split_meanings)
            .unwrap_or_default()
    }
}
