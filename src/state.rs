//! Language state store.
//!
//! Holds the current target language and the auto-detect flag, restores both
//! from a `PreferenceStore` once at construction, and persists every change.
//! A language change also clears the UI-level translation cache and publishes
//! a new `LanguageSnapshot` (including the layout direction) to watchers.

use crate::cache::TranslationCache;
use crate::i18n::{Language, LayoutDirection};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const LANGUAGE_KEY: &str = "language";
pub const AUTO_DETECT_KEY: &str = "auto_detect";

/// Key-value persistence for user preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a previous session had saved these entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.lock().extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// Preference store backed by a JSON file.
pub struct FilePreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PreferencesFile> {
        if !self.path.exists() {
            return Ok(PreferencesFile::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut file = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable preferences file: {:#}", e);
            PreferencesFile::default()
        });
        file.entries.insert(key.to_string(), value.to_string());
        file.updated_at = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let text = serde_json::to_string_pretty(&file).context("failed to serialize preferences")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Current language state as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageSnapshot {
    pub language: Language,
    pub auto_detect: bool,
    pub direction: LayoutDirection,
}

#[derive(Debug, Clone, Copy)]
struct LanguageState {
    current: Language,
    auto_detect: bool,
}

impl LanguageState {
    fn snapshot(&self) -> LanguageSnapshot {
        LanguageSnapshot {
            language: self.current,
            auto_detect: self.auto_detect,
            direction: self.current.direction(),
        }
    }
}

pub struct LanguageStateStore {
    state: Mutex<LanguageState>,
    cache: Arc<TranslationCache>,
    preferences: Arc<dyn PreferenceStore>,
    snapshots: watch::Sender<LanguageSnapshot>,
}

impl LanguageStateStore {
    /// Restore state from `preferences`, defaulting to English with
    /// auto-detect off for anything missing or unreadable.
    pub fn new(cache: Arc<TranslationCache>, preferences: Arc<dyn PreferenceStore>) -> Self {
        let state = LanguageState {
            current: restore_language(preferences.as_ref()),
            auto_detect: restore_auto_detect(preferences.as_ref()),
        };
        info!(
            language = state.current.code(),
            auto_detect = state.auto_detect,
            "Restored language state"
        );

        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            cache,
            preferences,
            snapshots,
        }
    }

    pub fn current_language(&self) -> Language {
        self.state.lock().current
    }

    /// The UI cache this store clears on language change.
    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn auto_detect(&self) -> bool {
        self.state.lock().auto_detect
    }

    /// Layout direction of the current language.
    pub fn direction(&self) -> LayoutDirection {
        self.current_language().direction()
    }

    pub fn snapshot(&self) -> LanguageSnapshot {
        self.state.lock().snapshot()
    }

    /// Receive a new snapshot after every language or auto-detect change.
    pub fn subscribe(&self) -> watch::Receiver<LanguageSnapshot> {
        self.snapshots.subscribe()
    }

    /// Switch the target language.
    ///
    /// No-op (returns `false`) when `language` is already current. Otherwise
    /// persists it, clears the whole UI translation cache, and publishes the
    /// new snapshot with the language's layout direction. All of it happens
    /// under the state lock, so watchers see changes in the order they apply.
    pub fn change_language(&self, language: Language) -> bool {
        let mut state = self.state.lock();
        if state.current == language {
            debug!(language = language.code(), "Language unchanged");
            return false;
        }
        state.current = language;
        persist(self.preferences.as_ref(), LANGUAGE_KEY, language.code());

        let cleared = self.cache.clear();
        let snapshot = state.snapshot();
        self.snapshots.send_replace(snapshot);
        drop(state);

        info!(
            language = language.code(),
            direction = snapshot.direction.as_str(),
            cleared,
            "Language changed"
        );
        true
    }

    /// Flip and persist the auto-detect flag. Returns the new value.
    pub fn toggle_auto_detect(&self) -> bool {
        let mut state = self.state.lock();
        state.auto_detect = !state.auto_detect;
        persist(
            self.preferences.as_ref(),
            AUTO_DETECT_KEY,
            if state.auto_detect { "true" } else { "false" },
        );
        let snapshot = state.snapshot();
        self.snapshots.send_replace(snapshot);
        drop(state);

        info!(auto_detect = snapshot.auto_detect, "Auto-detect toggled");
        snapshot.auto_detect
    }
}

fn persist(preferences: &dyn PreferenceStore, key: &str, value: &str) {
    if let Err(e) = preferences.set(key, value) {
        warn!("Failed to persist preference '{}': {:#}", key, e);
    }
}

fn restore_language(preferences: &dyn PreferenceStore) -> Language {
    match preferences.get(LANGUAGE_KEY) {
        Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|e| {
            warn!("Ignoring persisted language: {}", e);
            Language::canonical()
        }),
        Ok(None) => Language::canonical(),
        Err(e) => {
            warn!("Failed to read persisted language: {:#}", e);
            Language::canonical()
        }
    }
}

fn restore_auto_detect(preferences: &dyn PreferenceStore) -> bool {
    match preferences.get(AUTO_DETECT_KEY) {
        Ok(Some(value)) => value.trim().eq_ignore_ascii_case("true"),
        Ok(None) => false,
        Err(e) => {
            warn!("Failed to read persisted auto-detect flag: {:#}", e);
            false
        }
    }
}
