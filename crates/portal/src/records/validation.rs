//! Field-level validation and form input access.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use schoolcom_core::Email;
use serde::Deserialize;

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    InvalidChoice,
    InvalidDate,
    InvalidColor,
}

impl FieldErrorKind {
    /// Translation key of the message; takes a `{field}` replacement.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Required => "validation.required",
            Self::InvalidEmail => "validation.invalidEmail",
            Self::InvalidChoice => "validation.invalidChoice",
            Self::InvalidDate => "validation.invalidDate",
            Self::InvalidColor => "validation.invalidColor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

/// Every problem found in one draft. At most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single `Required` error.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        let mut errors = Self::new();
        errors.add(field, FieldErrorKind::Required);
        errors
    }

    /// Record an error unless the field already has one.
    pub fn add(&mut self, field: &'static str, kind: FieldErrorKind) {
        if self.for_field(field).is_none() {
            self.errors.push(FieldError { field, kind });
        }
    }

    /// Record `Required` when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, FieldErrorKind::Required);
        }
    }

    /// Record `Required` when `value` is `None`.
    pub fn require_some<T>(&mut self, field: &'static str, value: Option<&T>) {
        if value.is_none() {
            self.add(field, FieldErrorKind::Required);
        }
    }

    /// Fold another set in, keeping the first error per field.
    pub fn merge(&mut self, other: Self) {
        for error in other.errors {
            self.add(error.field, error.kind);
        }
    }

    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<FieldErrorKind> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.kind)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {:?}", e.field, e.kind))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Submitted (or prefilled) form values keyed by field name.
///
/// Parsing helpers trim input and record format problems; missing values
/// come back as empty strings or `None` for the draft's own validation to
/// report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, for prefilling edit forms.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Builder-style [`FormFields::set`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Trimmed value, `None` when absent or blank.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed value or an empty string.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_owned()
    }

    #[must_use]
    pub fn optional(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_owned)
    }

    /// HTML checkboxes are only submitted when ticked.
    #[must_use]
    pub fn checkbox(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v != "false" && v != "off")
    }

    /// Parse one of a closed set of values.
    pub fn choice<T: FromStr>(&self, name: &'static str, errors: &mut ValidationErrors) -> Option<T> {
        let raw = self.get(name)?;
        let parsed = raw.parse().ok();
        if parsed.is_none() {
            errors.add(name, FieldErrorKind::InvalidChoice);
        }
        parsed
    }

    pub fn email(&self, name: &'static str, errors: &mut ValidationErrors) -> Option<Email> {
        let raw = self.get(name)?;
        let parsed = Email::parse(raw).ok();
        if parsed.is_none() {
            errors.add(name, FieldErrorKind::InvalidEmail);
        }
        parsed
    }

    /// Parse an HTML date input (`YYYY-MM-DD`).
    pub fn date(&self, name: &'static str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
        let raw = self.get(name)?;
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
        if parsed.is_none() {
            errors.add(name, FieldErrorKind::InvalidDate);
        }
        parsed
    }

    /// Parse an HTML color input (`#rrggbb`), falling back to `default` when absent.
    pub fn color(
        &self,
        name: &'static str,
        default: &str,
        errors: &mut ValidationErrors,
    ) -> String {
        let Some(raw) = self.get(name) else {
            return default.to_owned();
        };
        if is_hex_color(raw) {
            raw.to_ascii_uppercase()
        } else {
            errors.add(name, FieldErrorKind::InvalidColor);
            default.to_owned()
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use schoolcom_core::SchoolStatus;

    use super::*;

    #[test]
    fn test_one_error_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", FieldErrorKind::InvalidEmail);
        errors.require("email", "");
        errors.require("name", " ");
        assert_eq!(errors.for_field("email"), Some(FieldErrorKind::InvalidEmail));
        assert_eq!(errors.for_field("name"), Some(FieldErrorKind::Required));
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_form_fields_trim_and_blank() {
        let fields = FormFields::new().with("name", "  Oakridge ").with("phone", "   ");
        assert_eq!(fields.text("name"), "Oakridge");
        assert_eq!(fields.optional("phone"), None);
        assert!(!fields.checkbox("visible"));
        assert!(fields.clone().with("visible", "on").checkbox("visible"));
    }

    #[test]
    fn test_choice_parsing() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new().with("status", "active").with("other", "bogus");
        assert_eq!(
            fields.choice::<SchoolStatus>("status", &mut errors),
            Some(SchoolStatus::Active)
        );
        assert_eq!(fields.choice::<SchoolStatus>("other", &mut errors), None);
        assert_eq!(fields.choice::<SchoolStatus>("missing", &mut errors), None);
        assert_eq!(errors.for_field("other"), Some(FieldErrorKind::InvalidChoice));
        assert_eq!(errors.for_field("missing"), None);
    }

    #[test]
    fn test_date_and_color() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("date", "2024-03-01")
            .with("bad", "03/01/2024")
            .with("color", "#4caf50")
            .with("badColor", "green");
        assert_eq!(
            fields.date("date", &mut errors),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(fields.date("bad", &mut errors), None);
        assert_eq!(fields.color("color", "#000000", &mut errors), "#4CAF50");
        assert_eq!(fields.color("badColor", "#000000", &mut errors), "#000000");
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let mut errors = ValidationErrors::new();
        errors.require_some::<String>("teacher", None);
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "teacher: Required");
    }
}
