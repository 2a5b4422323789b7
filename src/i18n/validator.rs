//! Translation quality validation.
//!
//! UI strings carry tokens that must come back from the translation service
//! untouched: `{placeholders}` filled in at render time, printf-style format
//! specifiers, numbers (record ids, dosages, bed counts), and URLs.

use regex::Regex;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Validator for translated UI text.
pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static FORMAT_SPEC_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Compare a translation against its source text.
    ///
    /// An empty translation of a non-empty source is an error. Lost or
    /// altered placeholders, format specifiers, numbers, or URLs are warnings;
    /// order is ignored since target grammar may reorder them.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !original.trim().is_empty() && translated.trim().is_empty() {
            report
                .errors
                .push("Translation is empty for non-empty source".to_string());
            return report;
        }

        let checks: [(&str, fn(&str) -> Vec<String>); 4] = [
            ("Placeholder", Self::extract_placeholders),
            ("Format specifier", Self::extract_format_specs),
            ("Number", Self::extract_numbers),
            ("URL", Self::extract_urls),
        ];

        for (label, extract) in checks {
            let mut orig = extract(original);
            let mut trans = extract(translated);
            orig.sort();
            trans.sort();
            if orig != trans {
                report.warnings.push(format!(
                    "{} mismatch: original has {:?}, translation has {:?}",
                    label, orig, trans
                ));
            }
        }

        report
    }

    /// `{name}` and `{{name}}` style placeholders
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{\{?\s*[A-Za-z0-9_.]+\s*\}\}?").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// `%s`, `%d`, `%1$s` style specifiers
    fn extract_format_specs(text: &str) -> Vec<String> {
        let regex =
            FORMAT_SPEC_REGEX.get_or_init(|| Regex::new(r"%(?:\d+\$)?[sdif]").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// ASCII digit runs, with an optional decimal part
    fn extract_numbers(text: &str) -> Vec<String> {
        let regex = NUMBER_REGEX.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

        let without_urls = URL_REGEX
            .get_or_init(url_regex)
            .replace_all(text, " ");
        let without_specs = FORMAT_SPEC_REGEX
            .get_or_init(|| Regex::new(r"%(?:\d+\$)?[sdif]").unwrap())
            .replace_all(&without_urls, " ");

        regex
            .find_iter(&without_specs)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX.get_or_init(url_regex);

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn url_regex() -> Regex {
    Regex::new(r"https?://[^\s)\]]+").unwrap()
}
