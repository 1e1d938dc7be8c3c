//! Custom Askama template filters.

use std::fmt::Display;

/// Characters kept by [`excerpt`].
pub const EXCERPT_CHARS: usize = 120;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Shortens text for list previews, ending on a word boundary.
///
/// Usage in templates: `{{ notification.content|excerpt }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(shorten(&value.to_string(), EXCERPT_CHARS))
}

fn shorten(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max).collect();
    let trimmed = cut
        .rfind(char::is_whitespace)
        .map_or(cut.as_str(), |end| cut.get(..end).unwrap_or(&cut));
    format!("{}…", trimmed.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("  Field trip on Friday ", 40), "Field trip on Friday");
    }

    #[test]
    fn test_shorten_breaks_on_words() {
        assert_eq!(shorten("Reminder about the science fair", 15), "Reminder about…");
    }

    #[test]
    fn test_shorten_without_spaces() {
        assert_eq!(shorten("abcdefghij", 4), "abcd…");
    }
}
