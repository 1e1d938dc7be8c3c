//! Language switch.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::i18n::toggle_language;
use crate::middleware::CurrentPage;

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    /// Page to return to.
    #[serde(default)]
    pub next: String,
}

/// Only same-site absolute paths are followed.
///
/// Browsers drop tabs and newlines while parsing a `Location`, so a path
/// holding control characters could still turn into `//host`.
fn safe_return_path(next: &str) -> &str {
    if next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control)
    {
        next
    } else {
        "/"
    }
}

/// Switch between English and Spanish and go back to the page.
#[instrument(skip_all)]
pub async fn toggle(
    CurrentPage(page): CurrentPage,
    Form(form): Form<LanguageForm>,
) -> Result<Response, AppError> {
    if let Some(storage) = &page.storage {
        let language = toggle_language(storage, page.translator.language()).await?;
        tracing::debug!(language = language.code(), "language changed");
    }
    Ok(Redirect::to(safe_return_path(&form.next)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path("/teacher/calendar"), "/teacher/calendar");
        assert_eq!(safe_return_path("https://evil.example"), "/");
        assert_eq!(safe_return_path("//evil.example"), "/");
        assert_eq!(safe_return_path(""), "/");
    }

    #[test]
    fn test_safe_return_path_rejects_control_characters() {
        assert_eq!(safe_return_path("/\t/evil.example/"), "/");
        assert_eq!(safe_return_path("/a\nb"), "/");
        assert_eq!(safe_return_path("/parent\r\n"), "/");
    }
}
