//! Remote translation client.
//!
//! `RemoteTranslationClient` is the only component that performs network I/O.
//! It wraps a `TranslationBackend` with retries, a bounded insertion-ordered
//! cache, and a fail-soft surface: the public `translate_*` methods never
//! return an error, they hand back the input unchanged and log the failure.
//! The `try_*` variants expose the error for callers that must not cache a
//! failed result.

use crate::cache::{BoundedCache, TranslationKey, AUTO_SOURCE};
use crate::config::Config;
use crate::i18n::{TranslationMetrics, TranslationValidator};
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use indexmap::IndexSet;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("translation API key not configured")]
    MissingCredential,

    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode translation response: {0}")]
    Decode(String),

    #[error("translation service returned {actual} results for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("translation request timed out after {0:?}")]
    Timeout(Duration),
}

impl RemoteError {
    /// Transport errors, timeouts, 429 and 5xx are transient; everything
    /// else fails the same way on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Transport(_) | RemoteError::Timeout(_) => true,
            RemoteError::Status { status, .. } => *status == 429 || *status >= 500,
            RemoteError::MissingCredential
            | RemoteError::Decode(_)
            | RemoteError::CountMismatch { .. } => false,
        }
    }
}

/// A translation service reachable over the network.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `texts` into `target`, returning one result per input in
    /// input order. `source` of `None` asks the service to detect it.
    async fn translate(
        &self,
        texts: &[String],
        target: &str,
        source: Option<&str>,
    ) -> Result<Vec<String>, RemoteError>;

    /// Detect the language of `text`. `Ok(None)` when the service has no guess.
    async fn detect(&self, text: &str) -> Result<Option<String>, RemoteError>;
}

// ==================== Google Cloud Translation (v2) ====================

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct DetectionsData {
    detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Backend for the Google Cloud Translation v2 REST API.
pub struct GoogleTranslateBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleTranslateBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("X-Goog-Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(RemoteError::Status { status, body });
        }

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(parsed.data)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(
        &self,
        texts: &[String],
        target: &str,
        source: Option<&str>,
    ) -> Result<Vec<String>, RemoteError> {
        let request = TranslateRequest {
            q: texts,
            target,
            source,
            format: "text",
        };
        let data: TranslationsData = self.post("/language/translate/v2", &request).await?;
        Ok(data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect())
    }

    async fn detect(&self, text: &str) -> Result<Option<String>, RemoteError> {
        let data: DetectionsData = self
            .post("/language/translate/v2/detect", &DetectRequest { q: text })
            .await?;

        let best = data
            .detections
            .into_iter()
            .flatten()
            .max_by(|a, b| {
                a.confidence
                    .unwrap_or(0.0)
                    .total_cmp(&b.confidence.unwrap_or(0.0))
            });
        Ok(best
            .map(|d| d.language)
            .filter(|code| !code.is_empty() && code != "und"))
    }
}

// ==================== Fail-soft client ====================

pub struct RemoteTranslationClient {
    backend: Option<Arc<dyn TranslationBackend>>,
    cache: Mutex<BoundedCache>,
    retry: RetryConfig,
    metrics: Arc<TranslationMetrics>,
}

impl RemoteTranslationClient {
    /// Build a client around `backend`. `None` means no credential is
    /// available: every operation becomes a pass-through.
    pub fn new(
        backend: Option<Arc<dyn TranslationBackend>>,
        max_cache_size: usize,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        if backend.is_none() {
            warn!("No translation credential configured; translations will pass text through unchanged");
        }
        Self {
            backend,
            cache: Mutex::new(BoundedCache::new(max_cache_size)),
            retry: RetryConfig::translation(),
            metrics,
        }
    }

    /// Google backend when an API key is configured, pass-through otherwise.
    pub fn from_config(config: &Config, metrics: Arc<TranslationMetrics>) -> Self {
        let backend = config.translate_api_key.as_ref().map(|key| {
            Arc::new(GoogleTranslateBackend::new(&config.translate_api_url, key))
                as Arc<dyn TranslationBackend>
        });
        Self::new(backend, config.remote_cache_max, metrics)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Translate one text, returning it unchanged on any failure.
    pub async fn translate_one(&self, text: &str, target: &str, source: &str) -> String {
        match self.try_translate_one(text, target, source, false).await {
            Ok(translated) => translated,
            Err(RemoteError::MissingCredential) => text.to_string(),
            Err(e) => {
                warn!("Translation to '{}' failed, using original text: {}", target, e);
                text.to_string()
            }
        }
    }

    /// Translate many texts in one request, returning the input unchanged on
    /// any failure. Output has the same length and order as `texts`.
    pub async fn translate_batch(&self, texts: &[String], target: &str, source: &str) -> Vec<String> {
        match self.try_translate_batch(texts, target, source, false).await {
            Ok(translated) => translated,
            Err(RemoteError::MissingCredential) => texts.to_vec(),
            Err(e) => {
                warn!(
                    "Batch translation of {} texts to '{}' failed, using original texts: {}",
                    texts.len(),
                    target,
                    e
                );
                texts.to_vec()
            }
        }
    }

    /// Detect the language of `text`. `None` on failure or no guess.
    pub async fn detect_language(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let backend = self.backend.as_deref()?;

        self.metrics.record_api_call();
        let result = with_retry_if(
            &self.retry,
            "Language detection",
            move || backend.detect(text),
            RemoteError::is_retryable,
        )
        .await;

        match result {
            Ok(code) => code,
            Err(e) => {
                self.metrics.record_api_failure();
                warn!("Language detection failed: {}", e);
                None
            }
        }
    }

    pub async fn try_translate_one(
        &self,
        text: &str,
        target: &str,
        source: &str,
        bypass_cache: bool,
    ) -> Result<String, RemoteError> {
        let texts = [text.to_string()];
        let mut translated = self
            .try_translate_batch(&texts, target, source, bypass_cache)
            .await?;
        translated.pop().ok_or(RemoteError::CountMismatch {
            expected: 1,
            actual: 0,
        })
    }

    /// Translate `texts`, serving what it can from the bounded cache and
    /// requesting only the distinct uncached texts in a single call.
    ///
    /// `source` of `"auto"` lets the service detect the source language.
    pub async fn try_translate_batch(
        &self,
        texts: &[String],
        target: &str,
        source: &str,
        bypass_cache: bool,
    ) -> Result<Vec<String>, RemoteError> {
        let backend = self
            .backend
            .as_deref()
            .ok_or(RemoteError::MissingCredential)?;

        let mut results: Vec<Option<String>> = {
            let cache = self.cache.lock();
            texts
                .iter()
                .map(|text| {
                    if bypass_cache {
                        return None;
                    }
                    cache
                        .get(&TranslationKey::new(source, target, text.as_str()))
                        .cloned()
                })
                .collect()
        };
        let hits = results.iter().filter(|r| r.is_some()).count();
        for _ in 0..hits {
            self.metrics.record_remote_cache_hit();
        }

        let missing: IndexSet<&String> = texts
            .iter()
            .zip(&results)
            .filter(|(_, cached)| cached.is_none())
            .map(|(text, _)| text)
            .collect();
        if missing.is_empty() {
            debug!(count = texts.len(), target, "Served batch from remote cache");
            return Ok(results.into_iter().flatten().collect());
        }

        let request: Vec<String> = missing.iter().map(|t| (*t).clone()).collect();
        let source_param = (source != AUTO_SOURCE).then_some(source);

        self.metrics.record_api_call();
        let translated = with_retry_if(
            &self.retry,
            &format!("Translation to {}", target),
            || backend.translate(&request, target, source_param),
            RemoteError::is_retryable,
        )
        .await
        .and_then(|translated| {
            if translated.len() == request.len() {
                Ok(translated)
            } else {
                Err(RemoteError::CountMismatch {
                    expected: request.len(),
                    actual: translated.len(),
                })
            }
        })
        .inspect_err(|_| self.metrics.record_api_failure())?;

        {
            let mut cache = self.cache.lock();
            for (original, value) in request.iter().zip(&translated) {
                let report = TranslationValidator::validate(original, value);
                if !report.is_clean() {
                    warn!(
                        "Translation validation issues for '{}' -> {}: {:?} {:?}",
                        original, target, report.errors, report.warnings
                    );
                }
                let evicted = cache.insert(
                    TranslationKey::new(source, target, original.as_str()),
                    value.clone(),
                );
                if evicted > 0 {
                    self.metrics.record_evictions(evicted);
                }
            }
        }

        for (slot, text) in results.iter_mut().zip(texts) {
            if slot.is_none() {
                let index = missing.get_index_of(text).unwrap_or_default();
                *slot = translated.get(index).cloned();
            }
        }
        debug!(
            requested = request.len(),
            cached = hits,
            target,
            "Batch translated"
        );
        Ok(results
            .into_iter()
            .zip(texts)
            .map(|(slot, text)| slot.unwrap_or_else(|| text.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    /// Backend that tags each text with the target language.
    #[derive(Default)]
    struct TaggingBackend {
        calls: AtomicUsize,
        texts_sent: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl TranslationBackend for TaggingBackend {
        async fn translate(
            &self,
            texts: &[String],
            target: &str,
            _source: Option<&str>,
        ) -> Result<Vec<String>, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts_sent.lock().push(texts.to_vec());
            Ok(texts.iter().map(|t| format!("[{}] {}", target, t)).collect())
        }

        async fn detect(&self, _text: &str) -> Result<Option<String>, RemoteError> {
            Ok(Some("es".to_string()))
        }
    }

    /// Backend that returns one result too few.
    struct ShortBackend;

    #[async_trait]
    impl TranslationBackend for ShortBackend {
        async fn translate(
            &self,
            texts: &[String],
            _target: &str,
            _source: Option<&str>,
        ) -> Result<Vec<String>, RemoteError> {
            Ok(texts.iter().skip(1).cloned().collect())
        }

        async fn detect(&self, _text: &str) -> Result<Option<String>, RemoteError> {
            Err(RemoteError::Status {
                status: 400,
                body: "bad".to_string(),
            })
        }
    }

    fn strings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn client_with(backend: Arc<dyn TranslationBackend>, max: usize) -> RemoteTranslationClient {
        RemoteTranslationClient::new(Some(backend), max, Arc::new(TranslationMetrics::new()))
            .with_retry(RetryConfig::no_retry())
    }

    fn google_client(server: &MockServer) -> RemoteTranslationClient {
        let backend = Arc::new(GoogleTranslateBackend::new(server.uri(), "test-key"));
        client_with(backend, 100)
    }

    fn translations_body(texts: &[&str]) -> serde_json::Value {
        json!({
            "data": {
                "translations": texts
                    .iter()
                    .map(|t| json!({ "translatedText": t }))
                    .collect::<Vec<_>>()
            }
        })
    }

    // ==================== RemoteError Tests ====================

    #[test]
    fn test_is_retryable_status_codes() {
        let status = |status| RemoteError::Status {
            status,
            body: String::new(),
        };
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(!status(400).is_retryable());
        assert!(!status(403).is_retryable());
    }

    #[test]
    fn test_is_retryable_other_errors() {
        assert!(RemoteError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!RemoteError::MissingCredential.is_retryable());
        assert!(!RemoteError::Decode("bad".to_string()).is_retryable());
        assert!(!RemoteError::CountMismatch {
            expected: 2,
            actual: 1
        }
        .is_retryable());
    }

    // ==================== Pass-through Tests ====================

    #[tokio::test]
    async fn test_missing_credential_passes_through() {
        let client = RemoteTranslationClient::new(None, 10, Arc::new(TranslationMetrics::new()));

        assert!(!client.is_configured());
        assert_eq!(client.translate_one("Hello", "es", "en").await, "Hello");
        assert_eq!(
            client.translate_batch(&strings(&["a", "b"]), "es", "en").await,
            strings(&["a", "b"])
        );
        assert!(client.detect_language("Hola").await.is_none());
        assert!(matches!(
            client.try_translate_one("Hello", "es", "en", false).await,
            Err(RemoteError::MissingCredential)
        ));
    }

    // ==================== Cache Tests ====================

    #[tokio::test]
    async fn test_translate_one_populates_cache() {
        let backend = Arc::new(TaggingBackend::default());
        let client = client_with(backend.clone(), 10);

        assert_eq!(client.translate_one("Save", "es", "en").await, "[es] Save");
        assert_eq!(client.translate_one("Save", "es", "en").await, "[es] Save");

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.cache_len(), 1);
        assert_eq!(client.metrics().remote_cache_hits(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_includes_languages() {
        let backend = Arc::new(TaggingBackend::default());
        let client = client_with(backend.clone(), 10);

        client.translate_one("Save", "es", "en").await;
        client.translate_one("Save", "hi", "en").await;
        client.translate_one("Save", "es", AUTO_SOURCE).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_bypass_cache_refetches() {
        let backend = Arc::new(TaggingBackend::default());
        let client = client_with(backend.clone(), 10);

        client.try_translate_one("Save", "es", "en", false).await.unwrap();
        client.try_translate_one("Save", "es", "en", true).await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_batch_requests_only_uncached_distinct_texts() {
        let backend = Arc::new(TaggingBackend::default());
        let client = client_with(backend.clone(), 10);
        client.translate_one("b", "es", "en").await;

        let result = client
            .translate_batch(&strings(&["a", "b", "c", "a"]), "es", "en")
            .await;

        assert_eq!(result, strings(&["[es] a", "[es] b", "[es] c", "[es] a"]));
        let sent = backend.texts_sent.lock();
        assert_eq!(sent.last().unwrap(), &strings(&["a", "c"]));
    }

    #[tokio::test]
    async fn test_cache_eviction_is_bounded() {
        let backend = Arc::new(TaggingBackend::default());
        let client = client_with(backend, 4);

        for i in 0..5 {
            client.translate_one(&format!("text {}", i), "es", "en").await;
        }

        assert!(client.cache_len() <= 2);
        assert_eq!(client.metrics().evictions(), 3);
    }

    #[tokio::test]
    async fn test_count_mismatch_fails_soft() {
        let client = client_with(Arc::new(ShortBackend), 10);
        let texts = strings(&["a", "b"]);

        assert!(matches!(
            client.try_translate_batch(&texts, "es", "en", false).await,
            Err(RemoteError::CountMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(client.translate_batch(&texts, "es", "en").await, texts);
        assert_eq!(client.cache_len(), 0);
        assert_eq!(client.metrics().api_failures(), 2);
    }

    #[tokio::test]
    async fn test_detect_error_returns_none() {
        let client = client_with(Arc::new(ShortBackend), 10);
        assert!(client.detect_language("Hola").await.is_none());
        assert!(client.detect_language("   ").await.is_none());
    }

    proptest! {
        #[test]
        fn prop_batch_preserves_order(
            warm in proptest::collection::vec("[a-d]{1,3}", 0..4),
            texts in proptest::collection::vec("[a-d]{1,3}", 0..12),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let client = client_with(Arc::new(TaggingBackend::default()), 100);

            let result = runtime.block_on(async {
                client.translate_batch(&warm, "es", "en").await;
                client.translate_batch(&texts, "es", "en").await
            });

            let expected: Vec<String> = texts.iter().map(|t| format!("[es] {}", t)).collect();
            prop_assert_eq!(result, expected);
        }
    }

    // ==================== Google Backend Tests (wiremock) ====================

    #[tokio::test]
    async fn test_google_translate_request_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(header("X-Goog-Api-Key", "test-key"))
            .and(body_json(json!({
                "q": ["Save", "Cancel"],
                "target": "es",
                "source": "en",
                "format": "text"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(translations_body(&["Guardar", "Cancelar"])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);
        let result = client
            .translate_batch(&strings(&["Save", "Cancel"]), "es", "en")
            .await;

        assert_eq!(result, strings(&["Guardar", "Cancelar"]));
    }

    #[tokio::test]
    async fn test_google_auto_source_omits_source_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(body_json(json!({
                "q": ["Hola"],
                "target": "en",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&["Hello"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);
        assert_eq!(client.translate_one("Hola", "en", AUTO_SOURCE).await, "Hello");
    }

    #[tokio::test]
    async fn test_google_server_error_fails_soft() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);

        let err = client
            .try_translate_one("Save", "es", "en", false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        assert_eq!(client.translate_one("Save", "es", "en").await, "Save");
        assert_eq!(client.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_google_retries_on_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(translations_body(&["Guardar"])))
            .mount(&mock_server)
            .await;

        let backend = Arc::new(GoogleTranslateBackend::new(mock_server.uri(), "test-key"));
        let client = client_with(backend, 10)
            .with_retry(RetryConfig::new(2, Duration::from_millis(10)));

        assert_eq!(client.translate_one("Save", "es", "en").await, "Guardar");
    }

    #[tokio::test]
    async fn test_google_no_retry_on_403() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = Arc::new(GoogleTranslateBackend::new(mock_server.uri(), "bad-key"));
        let client = client_with(backend, 10)
            .with_retry(RetryConfig::new(3, Duration::from_millis(10)));

        assert_eq!(client.translate_one("Save", "es", "en").await, "Save");
    }

    #[tokio::test]
    async fn test_google_malformed_body_fails_soft() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);
        assert!(matches!(
            client.try_translate_one("Save", "es", "en", false).await,
            Err(RemoteError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_google_detect_picks_most_confident() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2/detect"))
            .and(body_json(json!({ "q": "नमस्ते" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "detections": [[
                        { "language": "mr", "confidence": 0.3 },
                        { "language": "hi", "confidence": 0.9 }
                    ]]
                }
            })))
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);
        assert_eq!(client.detect_language("नमस्ते").await.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_google_detect_undetermined_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "detections": [[{ "language": "und", "confidence": 1.0 }]] }
            })))
            .mount(&mock_server)
            .await;

        let client = google_client(&mock_server);
        assert!(client.detect_language("???").await.is_none());
    }
}
