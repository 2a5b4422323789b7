//! Language type: validated language code plus layout direction.

use crate::i18n::{LanguageDescriptor, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// A language that has been validated against the registry.
///
/// Only enabled registry languages can be constructed, so holding a
/// `Language` means the code is known to the translation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

/// Direction the UI lays text out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const HINDI: Language = Language { code: "hi" };
    pub const SPANISH: Language = Language { code: "es" };
    pub const ARABIC: Language = Language { code: "ar" };

    /// Create a Language from a code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered and enabled
    /// * `Err` if the code is unknown or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The language UI text is authored in.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full descriptor from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a value built through `from_code` or the constants.
    pub fn descriptor(&self) -> &'static LanguageDescriptor {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn native_name(&self) -> &'static str {
        self.descriptor().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.descriptor().is_canonical
    }

    pub fn is_rtl(&self) -> bool {
        self.descriptor().is_rtl
    }

    /// Layout direction implied by this language.
    pub fn direction(&self) -> LayoutDirection {
        if self.is_rtl() {
            LayoutDirection::Rtl
        } else {
            LayoutDirection::Ltr
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl LayoutDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutDirection::Ltr => "ltr",
            LayoutDirection::Rtl => "rtl",
        }
    }
}
