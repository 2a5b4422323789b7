//! Language metadata and translation quality tooling.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their metadata
//! - `language`: Validated `Language` type and the layout direction it implies
//! - `validator`: Checks that translations keep placeholders, numbers and URLs
//! - `metrics`: Per-instance cache and remote-call counters
//!
//! # Example
//!
//! ```rust,ignore
//! use portal_translate::i18n::{Language, LanguageRegistry};
//!
//! let arabic = Language::from_code("ar")?;
//! assert!(arabic.is_rtl());
//!
//! let languages = LanguageRegistry::get().list_enabled();
//! ```

mod language;
mod metrics;
mod registry;
mod validator;

pub use language::{Language, LayoutDirection};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageDescriptor, LanguageRegistry};
pub use validator::{TranslationValidator, ValidationReport};
