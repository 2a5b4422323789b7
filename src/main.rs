use anyhow::Result;
use portal_translate::cache::TranslationCache;
use portal_translate::client::RemoteTranslationClient;
use portal_translate::config::Config;
use portal_translate::i18n::TranslationMetrics;
use portal_translate::server::{self, AppState};
use portal_translate::state::{FilePreferenceStore, LanguageStateStore};
use portal_translate::translator::{Translator, TranslatorSettings};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal_translate=info".parse()?),
        )
        .init();

    info!("Starting portal translation service");

    let config = Config::from_env();

    let metrics = Arc::new(TranslationMetrics::new());
    let client = Arc::new(RemoteTranslationClient::from_config(&config, metrics));
    let preferences = Arc::new(FilePreferenceStore::new(&config.preferences_file));
    let state = Arc::new(LanguageStateStore::new(
        Arc::new(TranslationCache::new()),
        preferences,
    ));
    let translator = Translator::new(client, state, TranslatorSettings::from_config(&config));

    info!(
        language = translator.current_language().code(),
        remote = translator.client().is_configured(),
        auth = config.api_key.is_some(),
        "Translator ready"
    );

    server::serve(AppState::new(translator, config.api_key.clone()), config.port).await
}
