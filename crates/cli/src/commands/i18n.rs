//! Locale inspection against the catalog compiled into the portal.

use schoolcom_core::Language;
use schoolcom_portal::i18n::{Catalog, CatalogError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Key has no translation in any language.
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

/// Parse a `name=value` replacement.
///
/// # Errors
///
/// Returns a message when there is no `=` or the name is empty.
pub fn parse_replacement(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected name=value, got `{raw}`")),
    }
}

/// Print every English key missing from `language`.
///
/// # Errors
///
/// Returns `I18nError::Catalog` if an embedded locale is malformed.
#[allow(clippy::print_stdout)]
pub fn missing(language: Language) -> Result<(), I18nError> {
    let catalog = Catalog::embedded()?;
    let missing = catalog.missing_keys(language);
    for key in &missing {
        println!("{key}");
    }
    tracing::info!(language = %language, count = missing.len(), "missing keys");
    Ok(())
}

/// Print the translation of `key`.
///
/// # Errors
///
/// Returns `I18nError::UnknownKey` when neither `language` nor English has it.
#[allow(clippy::print_stdout)]
pub fn get(key: &str, language: Language, replacements: &[(String, String)]) -> Result<(), I18nError> {
    let catalog = Catalog::embedded()?;
    if catalog.get(language, key).is_none() && catalog.get(Language::En, key).is_none() {
        return Err(I18nError::UnknownKey(key.to_owned()));
    }
    let pairs: Vec<(&str, &str)> = replacements
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    println!("{}", catalog.translate(language, key, &pairs));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replacement() {
        assert_eq!(
            parse_replacement("name=Ana María").unwrap(),
            ("name".to_string(), "Ana María".to_string())
        );
        assert_eq!(parse_replacement("x=").unwrap(), ("x".to_string(), String::new()));
        assert!(parse_replacement("name").is_err());
        assert!(parse_replacement("=Ana").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let err = get("nope.nothing", Language::Es, &[]).unwrap_err();
        assert!(matches!(err, I18nError::UnknownKey(_)));
    }
}
