//! Translation dispatch.
//!
//! `Translator` is the facade UI code talks to. Single texts go through a
//! debounced dispatcher: the first call for a key arms a timer, repeat calls
//! before it fires re-arm it, and every caller that arrives while the key is
//! pending is parked and settled with the same translated value once the
//! remote call completes. Groups of texts go through the batch dispatcher,
//! which has no debounce and issues one remote call per invocation.
//!
//! Every entry point is infallible: failures resolve to the untranslated
//! input.

use crate::cache::{TranslationCache, TranslationKey};
use crate::client::{RemoteError, RemoteTranslationClient};
use crate::config::Config;
use crate::i18n::{Language, MetricsReport};
use crate::options::OptionItem;
use crate::state::{LanguageSnapshot, LanguageStateStore};
use indexmap::IndexSet;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct TranslatorSettings {
    /// Default quiet period before a single-text request is sent.
    pub debounce: Duration,
    /// Upper bound on one remote call; on expiry the key stops being pending.
    pub request_timeout: Duration,
}

impl TranslatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            request_timeout: config.request_timeout(),
        }
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Options for [`Translator::t`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    /// Overrides the translator's default debounce.
    pub debounce: Option<Duration>,
    pub source: Language,
    /// Skip both cache layers. Still deduplicated against pending requests.
    pub force: bool,
}

impl TranslateOptions {
    pub fn with_source(mut self, source: Language) -> Self {
        self.source = source;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Options for [`Translator::t_batch`] and [`Translator::t_options`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub source: Language,
    pub force: bool,
}

impl BatchOptions {
    pub fn with_source(mut self, source: Language) -> Self {
        self.source = source;
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Change notifications for the UI cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A translation landed in the cache.
    Updated { key: TranslationKey, value: String },
    /// The cache was emptied because the language changed.
    Cleared { language: Language },
}

enum Phase {
    Armed { generation: u64, timer: JoinHandle<()> },
    InFlight,
}

struct PendingEntry {
    phase: Phase,
    force: bool,
    waiters: Vec<oneshot::Sender<String>>,
}

#[derive(Default)]
struct PendingSet {
    entries: HashMap<TranslationKey, PendingEntry>,
    next_generation: u64,
}

impl PendingSet {
    fn generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

struct Inner {
    client: Arc<RemoteTranslationClient>,
    state: Arc<LanguageStateStore>,
    settings: TranslatorSettings,
    pending: Mutex<PendingSet>,
    events: broadcast::Sender<CacheEvent>,
}

impl Inner {
    fn cache(&self) -> &TranslationCache {
        self.state.cache()
    }

    fn store(&self, key: TranslationKey, value: String) {
        self.cache().set(key.clone(), value.clone());
        let _ = self.events.send(CacheEvent::Updated { key, value });
    }

    /// Drop `key` from the pending set and hand `value` to everyone parked on it.
    fn settle(&self, key: &TranslationKey, value: String) {
        let waiters = self
            .pending
            .lock()
            .entries
            .remove(key)
            .map(|entry| entry.waiters)
            .unwrap_or_default();
        debug!(waiters = waiters.len(), target = %key.target, "Settled pending translation");
        for waiter in waiters {
            let _ = waiter.send(value.clone());
        }
    }
}

/// Cache-and-store object handed to whatever owns the UI tree.
///
/// Cloning is cheap and every clone shares the same caches and pending set.
#[derive(Clone)]
pub struct Translator {
    inner: Arc<Inner>,
}

impl Translator {
    pub fn new(
        client: Arc<RemoteTranslationClient>,
        state: Arc<LanguageStateStore>,
        settings: TranslatorSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                state,
                settings,
                pending: Mutex::new(PendingSet::default()),
                events,
            }),
        }
    }

    pub fn state(&self) -> &Arc<LanguageStateStore> {
        &self.inner.state
    }

    pub fn client(&self) -> &Arc<RemoteTranslationClient> {
        &self.inner.client
    }

    pub fn settings(&self) -> TranslatorSettings {
        self.inner.settings
    }

    // ==================== Single-text dispatch ====================

    /// Translate `text` into the current language.
    ///
    /// Resolves immediately for blank text, when the source is already the
    /// current language, or on a cache hit. Otherwise resolves with the
    /// translation once the debounced remote call completes, or with `text`
    /// unchanged if that call fails or times out.
    pub async fn t(&self, text: &str, options: TranslateOptions) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let target = self.current_language();
        if options.source == target {
            return text.to_string();
        }

        let key = TranslationKey::new(options.source.code(), target.code(), text);
        let metrics = self.inner.client.metrics();
        if !options.force {
            if let Some(cached) = self.inner.cache().get(&key) {
                metrics.record_cache_hit();
                return cached;
            }
        }
        metrics.record_cache_miss();

        let debounce = options.debounce.unwrap_or(self.inner.settings.debounce);
        let receiver = self.enqueue(key, debounce, options.force);
        receiver.await.unwrap_or_else(|_| text.to_string())
    }

    /// Register a waiter for `key`, arming or re-arming its timer.
    fn enqueue(&self, key: TranslationKey, debounce: Duration, force: bool) -> oneshot::Receiver<String> {
        let (sender, receiver) = oneshot::channel();
        let mut pending = self.inner.pending.lock();
        let generation = pending.generation();

        match pending.entries.get_mut(&key) {
            Some(entry) => {
                entry.waiters.push(sender);
                entry.force |= force;
                let armed = match &entry.phase {
                    Phase::Armed { timer, .. } => {
                        timer.abort();
                        true
                    }
                    Phase::InFlight => false,
                };
                if armed {
                    entry.phase = Phase::Armed {
                        generation,
                        timer: spawn_dispatch(self.inner.clone(), key.clone(), generation, debounce),
                    };
                    debug!(text = %key.text, target = %key.target, "Debounce re-armed");
                } else {
                    debug!(text = %key.text, target = %key.target, "Joined in-flight translation");
                }
            }
            None => {
                let timer = spawn_dispatch(self.inner.clone(), key.clone(), generation, debounce);
                pending.entries.insert(
                    key,
                    PendingEntry {
                        phase: Phase::Armed { generation, timer },
                        force,
                        waiters: vec![sender],
                    },
                );
            }
        }
        receiver
    }

    /// Whether a translation of `text` into the current language is pending.
    pub fn is_loading(&self, text: &str, source: Language) -> bool {
        let key = TranslationKey::new(source.code(), self.current_language().code(), text);
        self.inner.pending.lock().entries.contains_key(&key)
    }

    /// Cached translation of `text` into the current language, or `text`.
    pub fn get_cached(&self, text: &str, source: Language) -> String {
        let key = TranslationKey::new(source.code(), self.current_language().code(), text);
        self.inner
            .cache()
            .get(&key)
            .unwrap_or_else(|| text.to_string())
    }

    // ==================== Batch dispatch ====================

    /// Translate `texts` with one remote call for the uncached subset.
    ///
    /// The result has the same length and order as `texts`.
    pub async fn t_batch(&self, texts: &[String], options: BatchOptions) -> Vec<String> {
        let target = self.current_language();
        let metrics = self.inner.client.metrics();

        let mut results: Vec<Option<String>> = texts
            .iter()
            .map(|text| {
                if text.trim().is_empty() || options.source == target {
                    return Some(text.clone());
                }
                if options.force {
                    return None;
                }
                let key = TranslationKey::new(options.source.code(), target.code(), text.as_str());
                let cached = self.inner.cache().get(&key);
                if cached.is_some() {
                    metrics.record_cache_hit();
                } else {
                    metrics.record_cache_miss();
                }
                cached
            })
            .collect();

        let missing: IndexSet<String> = texts
            .iter()
            .zip(&results)
            .filter(|(_, slot)| slot.is_none())
            .map(|(text, _)| text.clone())
            .collect();
        if missing.is_empty() {
            return results.into_iter().flatten().collect();
        }

        let key_for = |text: &str| TranslationKey::new(options.source.code(), target.code(), text);

        // Pending keys are joined; the rest are claimed as in flight for this batch
        let (request, claim, joined) = {
            let mut pending = self.inner.pending.lock();
            let mut request = Vec::new();
            let mut claim = BatchClaim {
                inner: self.inner.as_ref(),
                keys: Vec::new(),
            };
            let mut joined = Vec::new();
            for text in &missing {
                let key = key_for(text);
                match pending.entries.get_mut(&key) {
                    Some(entry) => {
                        let (sender, receiver) = oneshot::channel();
                        entry.waiters.push(sender);
                        joined.push((text.clone(), receiver));
                    }
                    None => {
                        claim.keys.push(key.clone());
                        pending.entries.insert(
                            key,
                            PendingEntry {
                                phase: Phase::InFlight,
                                force: options.force,
                                waiters: Vec::new(),
                            },
                        );
                        request.push(text.clone());
                    }
                }
            }
            (request, claim, joined)
        };

        let mut resolved: HashMap<String, String> = HashMap::new();
        if !request.is_empty() {
            let timeout = self.inner.settings.request_timeout;
            let outcome = tokio::time::timeout(
                timeout,
                self.inner
                    .client
                    .try_translate_batch(&request, target.code(), options.source.code(), options.force),
            )
            .await
            .unwrap_or_else(|_| {
                metrics.record_api_failure();
                Err(RemoteError::Timeout(timeout))
            });

            match outcome {
                Ok(translated) => {
                    for (text, value) in request.iter().zip(translated) {
                        self.inner.store(key_for(text), value.clone());
                        resolved.insert(text.clone(), value);
                    }
                    debug!(
                        requested = request.len(),
                        joined = joined.len(),
                        total = texts.len(),
                        target = target.code(),
                        "Batch dispatched"
                    );
                }
                Err(RemoteError::MissingCredential) => {}
                Err(e) => {
                    warn!(
                        "Batch translation of {} texts to '{}' failed, using original texts: {}",
                        request.len(),
                        target,
                        e
                    );
                }
            }
        }
        claim.settle(&resolved);

        for (text, receiver) in joined {
            if let Ok(value) = receiver.await {
                resolved.insert(text, value);
            }
        }

        results
            .into_iter()
            .zip(texts)
            .map(|(slot, text)| {
                slot.or_else(|| resolved.get(text).cloned())
                    .unwrap_or_else(|| text.clone())
            })
            .collect()
    }

    /// Translate the visible text of `options` as one batch.
    pub async fn t_options(&self, options: &[OptionItem], batch: BatchOptions) -> Vec<OptionItem> {
        let labels: Vec<String> = options.iter().map(|o| o.label().to_string()).collect();
        let translated = self.t_batch(&labels, batch).await;
        options
            .iter()
            .cloned()
            .zip(translated)
            .map(|(option, label)| option.with_label(label))
            .collect()
    }

    // ==================== Language state ====================

    pub fn current_language(&self) -> Language {
        self.inner.state.current_language()
    }

    pub fn snapshot(&self) -> LanguageSnapshot {
        self.inner.state.snapshot()
    }

    /// Switch language, clearing the UI cache. Returns `false` if unchanged.
    pub fn change_language(&self, language: Language) -> bool {
        let changed = self.inner.state.change_language(language);
        if changed {
            let _ = self.inner.events.send(CacheEvent::Cleared { language });
        }
        changed
    }

    pub fn toggle_auto_detect(&self) -> bool {
        self.inner.state.toggle_auto_detect()
    }

    pub fn subscribe_language(&self) -> watch::Receiver<LanguageSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    // ==================== Detection ====================

    pub async fn detect_language(&self, text: &str) -> Option<String> {
        self.inner.client.detect_language(text).await
    }

    /// With auto-detect on, detect the language of `sample` and switch to it.
    ///
    /// Returns the language switched to. `None` when auto-detect is off, the
    /// detection failed, the detected language is not an enabled registry
    /// language, or it is already current.
    pub async fn apply_detected_language(&self, sample: &str) -> Option<Language> {
        if !self.inner.state.auto_detect() {
            debug!("Auto-detect disabled, ignoring sample");
            return None;
        }

        let code = self.detect_language(sample).await?;
        let language = match supported_language(&code) {
            Some(language) => language,
            None => {
                info!(code = %code, "Detected language is not supported");
                return None;
            }
        };

        self.change_language(language).then_some(language)
    }

    pub fn metrics(&self) -> MetricsReport {
        self.inner.client.metrics().report()
    }
}

/// Keys a batch claimed as in flight.
///
/// Dropping the claim before `settle` releases every key with its original
/// text, so a cancelled batch never leaves waiters parked.
struct BatchClaim<'a> {
    inner: &'a Inner,
    keys: Vec<TranslationKey>,
}

impl BatchClaim<'_> {
    fn settle(mut self, resolved: &HashMap<String, String>) {
        for key in std::mem::take(&mut self.keys) {
            let value = resolved
                .get(&key.text)
                .cloned()
                .unwrap_or_else(|| key.text.clone());
            self.inner.settle(&key, value);
        }
    }
}

impl Drop for BatchClaim<'_> {
    fn drop(&mut self) {
        for key in std::mem::take(&mut self.keys) {
            let original = key.text.clone();
            self.inner.settle(&key, original);
        }
    }
}

/// Map a detected code like `zh-CN` onto a registry language.
fn supported_language(code: &str) -> Option<Language> {
    Language::from_code(code).ok().or_else(|| {
        code.split(['-', '_'])
            .next()
            .and_then(|base| Language::from_code(base).ok())
    })
}

fn spawn_dispatch(
    inner: Arc<Inner>,
    key: TranslationKey,
    generation: u64,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(dispatch(inner, key, generation, delay))
}

/// Timer body for one armed key.
async fn dispatch(inner: Arc<Inner>, key: TranslationKey, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;

    let force = {
        let mut pending = inner.pending.lock();
        match pending.entries.get_mut(&key) {
            Some(entry) if matches!(entry.phase, Phase::Armed { generation: g, .. } if g == generation) => {
                entry.phase = Phase::InFlight;
                entry.force
            }
            // Re-armed or already settled
            _ => return,
        }
    };

    let timeout = inner.settings.request_timeout;
    let outcome = tokio::time::timeout(
        timeout,
        inner
            .client
            .try_translate_one(&key.text, &key.target, &key.source, force),
    )
    .await
    .unwrap_or_else(|_| {
        inner.client.metrics().record_api_failure();
        Err(RemoteError::Timeout(timeout))
    });

    let value = match outcome {
        Ok(translated) => {
            inner.store(key.clone(), translated.clone());
            translated
        }
        Err(RemoteError::MissingCredential) => key.text.clone(),
        Err(e) => {
            warn!("Translation of '{}' to '{}' failed, using original text: {}", key.text, key.target, e);
            key.text.clone()
        }
    };

    inner.settle(&key, value);
}
