//! Language registry: Single source of truth for all supported languages.
//!
//! The table is static. It is built once on first access through `OnceLock`
//! and never mutated afterwards, so it is the one piece of shared state that
//! stays a process-wide singleton.

use serde::Serialize;
use std::sync::OnceLock;

/// Descriptor of a supported language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageDescriptor {
    /// Short language code as understood by the translation service (e.g., "en", "hi")
    pub code: &'static str,

    /// English display name (e.g., "Hindi")
    pub name: &'static str,

    /// Name of the language in its own script (e.g., "हिन्दी")
    pub native_name: &'static str,

    /// Whether text in this language is laid out right-to-left
    pub is_rtl: bool,

    /// Whether this is the language UI text is authored in (only one should be true)
    pub is_canonical: bool,

    /// Whether this language can be selected
    pub enabled: bool,
}

/// Registry of every language the portal can be shown in.
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a descriptor by its exact code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All enabled languages, in display order.
    pub fn list_enabled(&self) -> Vec<&LanguageDescriptor> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// All languages, including disabled ones.
    pub fn list_all(&self) -> Vec<&LanguageDescriptor> {
        self.languages.iter().collect()
    }

    /// The canonical language UI text is written in.
    ///
    /// # Panics
    /// Panics if the table does not define exactly one canonical language.
    pub fn canonical(&self) -> &LanguageDescriptor {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// `true` if the code exists and is enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

const fn descriptor(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    is_rtl: bool,
) -> LanguageDescriptor {
    LanguageDescriptor {
        code,
        name,
        native_name,
        is_rtl,
        is_canonical: false,
        enabled: true,
    }
}

/// Languages offered by the portal. English is the authoring language.
fn default_languages() -> Vec<LanguageDescriptor> {
    vec![
        LanguageDescriptor {
            is_canonical: true,
            ..descriptor("en", "English", "English", false)
        },
        descriptor("hi", "Hindi", "हिन्दी", false),
        descriptor("bn", "Bengali", "বাংলা", false),
        descriptor("te", "Telugu", "తెలుగు", false),
        descriptor("mr", "Marathi", "मराठी", false),
        descriptor("ta", "Tamil", "தமிழ்", false),
        descriptor("gu", "Gujarati", "ગુજરાતી", false),
        descriptor("kn", "Kannada", "ಕನ್ನಡ", false),
        descriptor("ml", "Malayalam", "മലയാളം", false),
        descriptor("pa", "Punjabi", "ਪੰਜਾਬੀ", false),
        descriptor("or", "Odia", "ଓଡ଼ିଆ", false),
        descriptor("ur", "Urdu", "اردو", true),
        descriptor("ar", "Arabic", "العربية", true),
        descriptor("es", "Spanish", "Español", false),
        descriptor("fr", "French", "Français", false),
        descriptor("de", "German", "Deutsch", false),
        descriptor("zh", "Chinese", "中文", false),
        descriptor("ja", "Japanese", "日本語", false),
    ]
}
