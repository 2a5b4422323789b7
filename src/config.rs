use std::time::Duration;

pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translation.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    // Translation service
    pub translate_api_key: Option<String>,
    pub translate_api_url: String,

    // Dispatch
    pub debounce_ms: u64,
    pub remote_cache_max: usize,
    pub request_timeout_secs: u64,

    // Persisted language state
    pub preferences_file: String,

    // HTTP binding
    pub api_key: Option<String>,
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Nothing is required: a missing translation key puts every remote
    /// operation in pass-through mode instead of failing startup. The client
    /// built from this config reports that.
    pub fn from_env() -> Self {
        Self {
            translate_api_key: non_empty_var("GOOGLE_TRANSLATE_API_KEY"),
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_API_URL.to_string()),

            debounce_ms: parsed_var("TRANSLATE_DEBOUNCE_MS").unwrap_or(300),
            remote_cache_max: parsed_var("TRANSLATE_CACHE_MAX").unwrap_or(1000),
            request_timeout_secs: parsed_var("TRANSLATE_TIMEOUT_SECS").unwrap_or(10),

            preferences_file: std::env::var("PREFERENCES_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),

            api_key: non_empty_var("API_KEY"),
            port: parsed_var("PORT").unwrap_or(8080),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
