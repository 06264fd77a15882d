pub mod anki_connect;
pub mod google_tts;
pub mod openai;
pub mod openai_adapter;

pub use anki_connect::AnkiConnectClient;
pub use google_tts::GoogleTtsClient;
pub use openai::OpenAiClient;
pub use openai_adapter::OpenAiContentGenerator;
