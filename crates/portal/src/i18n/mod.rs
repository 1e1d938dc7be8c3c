//! Localized interface text.
//!
//! Locale files are nested JSON objects embedded at compile time and
//! flattened to dotted keys (`{"common": {"new": "New"}}` becomes
//! `common.new`). Lookup tries the active language, then English, then
//! returns the key itself.
//!
//! The active language is a per-request value read from the session
//! storage under [`LANGUAGE_KEY`], never a process-wide global.

use std::collections::HashMap;
use std::sync::Arc;

use schoolcom_core::{KeyValueStore, Language, StorageError};
use serde_json::Value;
use thiserror::Error;

/// Storage key holding the active language code.
pub const LANGUAGE_KEY: &str = "schoolcom-language";

const EN_JSON: &str = include_str!("../../locales/en.json");
const ES_JSON: &str = include_str!("../../locales/es.json");

/// Errors loading a locale file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("locale {language} is not valid JSON: {source}")]
    Json {
        language: Language,
        #[source]
        source: serde_json::Error,
    },
    #[error("locale {language} must be a JSON object at the top level")]
    NotAnObject { language: Language },
}

/// Flattened translation tables for every supported language.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Catalog {
    /// Load the locale files compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if an embedded locale is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_sources(&[(Language::En, EN_JSON), (Language::Es, ES_JSON)])
    }

    /// Build a catalog from `(language, json)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a source is not a JSON object.
    pub fn from_sources(sources: &[(Language, &str)]) -> Result<Self, CatalogError> {
        let mut tables = HashMap::new();
        for &(language, json) in sources {
            let value: Value = serde_json::from_str(json)
                .map_err(|source| CatalogError::Json { language, source })?;
            if !value.is_object() {
                return Err(CatalogError::NotAnObject { language });
            }
            let mut table = HashMap::new();
            flatten("", &value, &mut table);
            tables.insert(language, table);
        }
        Ok(Self { tables })
    }

    /// Raw lookup in a single language, no fallback.
    #[must_use]
    pub fn get(&self, language: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    /// Every key of a language, sorted.
    #[must_use]
    pub fn keys(&self, language: Language) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .tables
            .get(&language)
            .map(|table| table.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Keys present in English but absent from `language`, sorted.
    #[must_use]
    pub fn missing_keys(&self, language: Language) -> Vec<&str> {
        self.keys(Language::En)
            .into_iter()
            .filter(|key| self.get(language, key).is_none())
            .collect()
    }

    /// Resolve `key` for `language` and substitute `{name}` placeholders.
    ///
    /// Falls back to English, then to the key itself. Every occurrence of a
    /// placeholder is replaced.
    #[must_use]
    pub fn translate(&self, language: Language, key: &str, replacements: &[(&str, &str)]) -> String {
        let text = self
            .get(language, key)
            .or_else(|| self.get(Language::En, key))
            .unwrap_or_else(|| {
                tracing::warn!(key, language = %language, "translation key not found");
                key
            });

        replacements
            .iter()
            .fold(text.to_owned(), |acc, (name, value)| {
                acc.replace(&format!("{{{name}}}"), value)
            })
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_owned(), s.clone());
        }
        // Only strings are translations
        _ => {}
    }
}

/// A catalog bound to the language of the current request.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
    language: Language,
}

impl Translator {
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>, language: Language) -> Self {
        Self { catalog, language }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Translate a key without replacements.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.catalog.translate(self.language, key, &[])
    }

    /// Translate a key with `{name}` replacements.
    #[must_use]
    pub fn t_with(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        self.catalog.translate(self.language, key, replacements)
    }
}

/// Read the active language from storage.
///
/// Missing, unknown or unreadable values yield `default`.
pub async fn hydrate_language<S: KeyValueStore>(storage: &S, default: Language) -> Language {
    match storage.get(LANGUAGE_KEY).await {
        Ok(Some(code)) => code.parse().unwrap_or(default),
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read language preference");
            default
        }
    }
}

/// Persist a language choice.
///
/// # Errors
///
/// Returns the storage error if the write fails.
pub async fn set_language<S: KeyValueStore>(
    storage: &S,
    language: Language,
) -> Result<(), StorageError> {
    storage.set(LANGUAGE_KEY, language.code().to_owned()).await
}

/// Switch `en` and `es`, persist the result and return it.
///
/// # Errors
///
/// Returns the storage error if the new value cannot be written.
pub async fn toggle_language<S: KeyValueStore>(
    storage: &S,
    default: Language,
) -> Result<Language, StorageError> {
    let next = hydrate_language(storage, default).await.toggled();
    set_language(storage, next).await?;
    Ok(next)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use schoolcom_core::MemoryStorage;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_sources(&[
            (
                Language::En,
                r#"{"common": {"new": "New", "save": "Save"}, "greet": "Hi {name}, {name}!"}"#,
            ),
            (Language::Es, r#"{"common": {"new": "Nuevo"}}"#),
        ])
        .unwrap()
    }

    #[test]
    fn test_active_language_first() {
        assert_eq!(catalog().translate(Language::Es, "common.new", &[]), "Nuevo");
    }

    #[test]
    fn test_falls_back_to_english() {
        assert_eq!(catalog().translate(Language::Es, "common.save", &[]), "Save");
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(
            catalog().translate(Language::Es, "common.absent", &[]),
            "common.absent"
        );
        // A branch is not a leaf
        assert_eq!(catalog().translate(Language::En, "common", &[]), "common");
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let text = catalog().translate(Language::En, "greet", &[("name", "Ana")]);
        assert_eq!(text, "Hi Ana, Ana!");
    }

    #[test]
    fn test_missing_keys_report() {
        assert_eq!(catalog().missing_keys(Language::Es), vec!["common.save", "greet"]);
    }

    #[test]
    fn test_rejects_non_object_locale() {
        let err = Catalog::from_sources(&[(Language::En, "[]")]).unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject { .. }));
    }

    #[test]
    fn test_embedded_locales_cover_every_english_key_lookup() {
        let catalog = Catalog::embedded().unwrap();
        for key in catalog.keys(Language::En) {
            assert_ne!(catalog.translate(Language::En, key, &[]), key);
        }
        assert_ne!(catalog.translate(Language::Es, "common.new", &[]), "common.new");
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_language() {
        let storage = MemoryStorage::new();
        assert_eq!(hydrate_language(&storage, Language::En).await, Language::En);

        let first = toggle_language(&storage, Language::En).await.unwrap();
        assert_eq!(first, Language::Es);
        assert_eq!(hydrate_language(&storage, Language::En).await, Language::Es);

        let second = toggle_language(&storage, Language::En).await.unwrap();
        assert_eq!(second, Language::En);
    }

    #[tokio::test]
    async fn test_unknown_stored_language_uses_default() {
        let storage = MemoryStorage::new();
        storage.set(LANGUAGE_KEY, "fr".to_string()).await.unwrap();
        assert_eq!(hydrate_language(&storage, Language::En).await, Language::En);
    }
}
