//! anki_vocab CLI: 単語情報を生成して Anki にカードを追加・削除します。
use std::io::{self, BufRead};

use anki_vocab::application::session::{self, Session, SessionSettings};
use anki_vocab::application::{AddOptions, ServiceContainer};
use anki_vocab::cli::Cli;
use anki_vocab::infrastructure::AppConfig;
use anki_vocab::infrastructure::config::config_path;
use anki_vocab::utils::config::EnvConfig;
use anki_vocab::utils::{env::load_env, profiling};
use anki_vocab::{AnkiVocabError, Result};
use clap::Parser;

fn init_logger() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if profiling::enabled() {
        builder.filter_module(profiling::TARGET, log::LevelFilter::Info);
    }
    builder.init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    load_env();
    EnvConfig::init();
    init_logger();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::debug!("severity={:?}", e.severity());
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.config {
        println!(
            "Configuration file location: {}",
            config_path(&EnvConfig::get()).display()
        );
        return Ok(());
    }

    let config = AppConfig::load()?;
    let deck_name = cli.deck.clone().unwrap_or_else(|| config.deck_name.clone());
    let model_name = cli.model.clone().unwrap_or_else(|| config.model_name.clone());
    let container = ServiceContainer::new(config);
    let mut stdout = io::stdout();

    if cli.interactive {
        container.require_openai_key()?;
        let settings = SessionSettings {
            deck_name,
            model_name,
            kind: cli.kind(),
            voice: container.voice(cli.no_audio, cli.voice.as_deref()),
        };
        let stdin = io::stdin();
        return Session::new(&container.vocab, settings)
            .run(stdin.lock(), &mut stdout)
            .await;
    }

    let headword = cli
        .headword()
        .ok_or_else(|| AnkiVocabError::Config("a word or expression is required".into()))?;

    if cli.delete {
        let stdin = io::stdin();
        let mut answers = stdin.lock().lines();
        session::delete_with_confirmation(
            &container.vocab,
            &headword,
            &deck_name,
            cli.yes,
            &mut answers,
            &mut stdout,
        )
        .await?;
        return Ok(());
    }

    container.require_openai_key()?;
    let options = AddOptions {
        deck_name,
        model_name,
        kind: cli.kind(),
        meanings: cli.meaning_list(),
        voice: container.voice(cli.no_audio, cli.voice.as_deref()),
    };
    session::add_and_report(&container.vocab, &headword, &options, &mut stdout).await?;
    Ok(())
}
