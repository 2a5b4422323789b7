//! Translation metrics and observability.
//!
//! Counters are owned by each translator instance (shared through `Arc`)
//! rather than a process-wide static, so isolated instances report
//! independently.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for UI cache, remote-client cache, and remote calls.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Lookups answered by the UI-level translation cache
    cache_hits: AtomicUsize,

    /// Lookups that missed the UI-level translation cache
    cache_misses: AtomicUsize,

    /// Texts answered by the remote client's bounded cache without a request
    remote_cache_hits: AtomicUsize,

    /// Requests sent to the translation service (one per batch)
    api_calls: AtomicUsize,

    /// Requests that ended in an error after retries
    api_failures: AtomicUsize,

    /// Entries dropped from the remote client's bounded cache
    evictions: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_cache_hit(&self) {
        self.remote_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: usize) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn remote_cache_hits(&self) -> usize {
        self.remote_cache_hits.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> usize {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Snapshot the counters with derived rates.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let calls = self.api_calls();
        let failures = self.api_failures();

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: percentage(hits, hits + misses),
            remote_cache_hits: self.remote_cache_hits(),
            api_calls: calls,
            api_failures: failures,
            api_success_rate: percentage(calls.saturating_sub(failures), calls),
            evictions: self.evictions(),
        }
    }
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// UI cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub remote_cache_hits: usize,
    pub api_calls: usize,
    pub api_failures: usize,

    /// API success rate as a percentage (0-100)
    pub api_success_rate: f64,

    pub evictions: usize,
}
