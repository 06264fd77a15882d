pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::{AnkiVocabError, Result};
