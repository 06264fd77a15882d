//! 統一エラーハンドリング
//!
//! このモジュールは anki_vocab 全体で使用する統一エラー型を定義します。
//! 外部サービスごとのエラーを区別し、呼び出し元へラベル付きで返します。

use thiserror::Error;

/// anki_vocab 全体で使用する統一エラー型
#[derive(Debug, Error)]
pub enum AnkiVocabError {
    // ========================================
    // 外部サービス関連エラー
    // ========================================
    /// 生成レスポンスが空、または形式不正
    #[error("Content generation failed: {0}")]
    ContentGeneration(String),

    /// 音声ストリームが返らない、または通信失敗
    #[error("Speech synthesis failed: {0}")]
    SpeechSynthesis(String),

    /// AnkiConnect が error を返した、または接続不可
    #[error("Flashcard service error: {0}")]
    FlashcardService(String),

    #[error("Note type '{name}' not found in Anki. Available note types: {}", available.join(", "))]
    NoteTypeNotFound { name: String, available: Vec<String> },

    // ========================================
    // 設定関連エラー
    // ========================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System error: {0}")]
    SystemError(String),
}

/// 統一Result型エイリアス
pub type Result<T> = std::result::Result<T, AnkiVocabError>;

// ========================================
// 文字列エラーからの変換
// ========================================

impl From<String> for AnkiVocabError {
    fn from(message: String) -> Self {
        AnkiVocabError::SystemError(message)
    }
}

impl From<&str> for AnkiVocabError {
    fn from(message: &str) -> Self {
        AnkiVocabError::SystemError(message.to_string())
    }
}

// ========================================
// ヘルパー関数
// ========================================

impl AnkiVocabError {
    /// エラーがユーザーアクションで解決可能かどうかを判定
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            AnkiVocabError::Config(_) | AnkiVocabError::NoteTypeNotFound { .. }
        )
    }

    /// エラーの重要度レベルを取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnkiVocabError::Config(_)
            | AnkiVocabError::NoteTypeNotFound { .. }
            | AnkiVocabError::FlashcardService(_)
            | AnkiVocabError::ContentGeneration(_) => ErrorSeverity::Error,

            // 音声は無くてもカードは作れる
            AnkiVocabError::SpeechSynthesis(_) => ErrorSeverity::Warning,

            _ => ErrorSeverity::Debug,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Debug,
    Info,
    Warning,
    Error,
}
