//! Email addresses entered into portal forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a form value is not an acceptable email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain exactly one @")]
    AtSymbol,
    #[error("email must not contain whitespace")]
    Whitespace,
    #[error("email must have a name before the @ and a domain after it")]
    MissingPart,
}

/// A trimmed email address with exactly one `@` and no whitespace.
///
/// Comparison is case-sensitive on the stored text; use
/// [`Email::eq_ignore_case`] when matching identifiers typed at sign-in.
///
/// ```
/// use schoolcom_core::Email;
///
/// let email = Email::parse("  admin@greenfield.edu ").unwrap();
/// assert_eq!(email.as_str(), "admin@greenfield.edu");
/// assert_eq!(email.domain(), "greenfield.edu");
///
/// assert!(Email::parse("admin").is_err());
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate a raw form value.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed value trips over.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::MissingPart);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, d)| d)
    }

    /// The part before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(l, _)| l)
    }

    /// Whether `other` names the same mailbox, ignoring ASCII case.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let email = Email::parse("\tteacher@school.edu\n").unwrap();
        assert_eq!(email.as_str(), "teacher@school.edu");
        assert_eq!(email.local_part(), "teacher");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("nobody"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.org"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("@school.edu"), Err(EmailError::MissingPart));
        assert_eq!(Email::parse("head@"), Err(EmailError::MissingPart));
        assert_eq!(Email::parse("jo hn@x.org"), Err(EmailError::Whitespace));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"p@home.net\"").unwrap();
        assert_eq!(ok.domain(), "home.net");
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }

    #[test]
    fn test_eq_ignore_case() {
        let email = Email::parse("Admin@School.edu").unwrap();
        assert!(email.eq_ignore_case("admin@school.edu "));
        assert!(!email.eq_ignore_case("other@school.edu"));
    }
}
