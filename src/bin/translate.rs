//! One-shot CLI: translate texts into a target language and print them.
//!
//! Usage: `translate <language-code> <text>...`

use anyhow::{bail, Context, Result};
use portal_translate::cache::TranslationCache;
use portal_translate::client::RemoteTranslationClient;
use portal_translate::config::Config;
use portal_translate::i18n::{Language, TranslationMetrics};
use portal_translate::state::{LanguageStateStore, MemoryPreferenceStore};
use portal_translate::translator::{BatchOptions, Translator, TranslatorSettings};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translate=info".parse()?)
                .add_directive("portal_translate=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(code) = args.next() else {
        bail!("Usage: translate <language-code> <text>...");
    };
    let texts: Vec<String> = args.collect();
    if texts.is_empty() {
        bail!("Nothing to translate");
    }
    let target = Language::from_code(&code).context("Unsupported target language")?;

    let config = Config::from_env();
    let client = Arc::new(RemoteTranslationClient::from_config(
        &config,
        Arc::new(TranslationMetrics::new()),
    ));
    let state = Arc::new(LanguageStateStore::new(
        Arc::new(TranslationCache::new()),
        Arc::new(MemoryPreferenceStore::new()),
    ));
    let translator = Translator::new(client, state, TranslatorSettings::from_config(&config));
    translator.change_language(target);

    info!("Translating {} texts to {}", texts.len(), target.name());

    // Every text is known up front, so one remote call covers them all
    let translated = translator.t_batch(&texts, BatchOptions::default()).await;

    for line in translated {
        println!("{}", line);
    }

    let report = translator.metrics();
    info!(
        api_calls = report.api_calls,
        api_failures = report.api_failures,
        "Done"
    );
    Ok(())
}
