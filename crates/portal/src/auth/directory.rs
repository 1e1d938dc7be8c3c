//! Identifier to role resolution.
//!
//! Sign-in does not talk to an identity provider. An identifier is looked
//! up first in an optional account table, then against a fixed list of
//! prefix rules (`system.admin…`, `school.admin…`, `teacher…`, `parent…`).

use std::path::Path;

use schoolcom_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use super::error::AuthError;
use super::session::Session;

/// Domain appended to identifiers that are not email addresses.
pub const FALLBACK_EMAIL_DOMAIN: &str = "schoolcom.app";

/// Prefix rules, checked in order, matched case-insensitively.
pub const PREFIX_RULES: [(&str, Role); 4] = [
    ("system.admin", Role::SystemAdmin),
    ("school.admin", Role::SchoolAdmin),
    ("teacher", Role::Teacher),
    ("parent", Role::Parent),
];

/// Errors loading an account table.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read account table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("account table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("account `{0}` has an invalid email")]
    InvalidEmail(String),
}

/// One row of the account table file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountEntry {
    identifier: String,
    display_name: String,
    role: Role,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    secret: Option<String>,
}

/// An explicitly configured account.
pub struct Account {
    identifier: String,
    display_name: String,
    email: Email,
    role: Role,
    secret: Option<SecretString>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("identifier", &self.identifier)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// Resolves sign-in identifiers to sessions.
#[derive(Debug, Default)]
pub struct IdentityDirectory {
    accounts: Vec<Account>,
}

impl IdentityDirectory {
    /// A directory with prefix rules only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an account table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse an account table: a JSON array of
    /// `{identifier, displayName, role, email?, secret?}` objects.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` for malformed JSON or emails.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let entries: Vec<AccountEntry> = serde_json::from_str(json)?;
        let accounts = entries
            .into_iter()
            .map(|entry| {
                let email = email_for(entry.email.as_deref().unwrap_or(&entry.identifier))
                    .ok_or_else(|| DirectoryError::InvalidEmail(entry.identifier.clone()))?;
                Ok(Account {
                    identifier: entry.identifier.trim().to_owned(),
                    display_name: entry.display_name,
                    email,
                    role: entry.role,
                    secret: entry.secret.map(SecretString::from),
                })
            })
            .collect::<Result<Vec<_>, DirectoryError>>()?;
        Ok(Self { accounts })
    }

    /// Number of configured accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Resolve an identifier (and optional secret) to a session.
    ///
    /// # Errors
    ///
    /// - `AuthError::EmptyIdentifier` for a blank identifier
    /// - `AuthError::InvalidCredentials` when nothing matches, or an account
    ///   with a configured secret is given a different one
    pub fn resolve(&self, identifier: &str, secret: Option<&str>) -> Result<Session, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::EmptyIdentifier);
        }

        if let Some(account) = self
            .accounts
            .iter()
            .find(|a| a.identifier.eq_ignore_ascii_case(identifier))
        {
            if let Some(expected) = &account.secret
                && secret != Some(expected.expose_secret())
            {
                return Err(AuthError::InvalidCredentials);
            }
            return Ok(Session {
                role: account.role,
                display_name: account.display_name.clone(),
                email: account.email.clone(),
            });
        }

        let lower = identifier.to_ascii_lowercase();
        let role = PREFIX_RULES
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|&(_, role)| role)
            .ok_or(AuthError::InvalidCredentials)?;
        let email = email_for(identifier).ok_or(AuthError::InvalidCredentials)?;

        Ok(Session {
            role,
            display_name: display_name_from(email.local_part()),
            email,
        })
    }
}

fn email_for(identifier: &str) -> Option<Email> {
    if identifier.contains('@') {
        Email::parse(identifier).ok()
    } else {
        Email::parse(&format!("{}@{FALLBACK_EMAIL_DOMAIN}", identifier.trim())).ok()
    }
}

/// `"emily.davis"` becomes `"Emily Davis"`.
fn display_name_from(local_part: &str) -> String {
    local_part
        .split(['.', '_', '-', '+'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_rules_resolve_each_role() {
        let directory = IdentityDirectory::new();
        for (identifier, role) in [
            ("system.admin@schoolcom.app", Role::SystemAdmin),
            ("school.admin@greenwood.edu", Role::SchoolAdmin),
            ("teacher.davis@greenwood.edu", Role::Teacher),
            ("parent@example.com", Role::Parent),
        ] {
            let session = directory.resolve(identifier, None).unwrap();
            assert_eq!(session.role, role, "{identifier}");
        }
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let session = IdentityDirectory::new()
            .resolve("Teacher.Emily@School.edu", None)
            .unwrap();
        assert_eq!(session.role, Role::Teacher);
        assert_eq!(session.display_name, "Teacher Emily");
    }

    #[test]
    fn test_bare_identifier_gets_fallback_email() {
        let session = IdentityDirectory::new().resolve("parent", None).unwrap();
        assert_eq!(session.email.as_str(), "parent@schoolcom.app");
        assert_eq!(session.display_name, "Parent");
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        let directory = IdentityDirectory::new();
        assert!(matches!(
            directory.resolve("guest@example.com", None),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            directory.resolve("   ", None),
            Err(AuthError::EmptyIdentifier)
        ));
    }

    #[test]
    fn test_account_table_takes_precedence() {
        let directory = IdentityDirectory::from_json(
            r#"[{"identifier": "parent.lead@school.edu", "displayName": "Dana Lee", "role": "schoolAdmin"}]"#,
        )
        .unwrap();
        let session = directory.resolve("PARENT.LEAD@school.edu", None).unwrap();
        assert_eq!(session.role, Role::SchoolAdmin);
        assert_eq!(session.display_name, "Dana Lee");
    }

    #[test]
    fn test_account_secret_is_enforced() {
        let directory = IdentityDirectory::from_json(
            r#"[{"identifier": "ops", "displayName": "Ops", "role": "systemAdmin", "email": "ops@school.edu", "secret": "k7#Qp9!x"}]"#,
        )
        .unwrap();
        assert!(matches!(
            directory.resolve("ops", Some("wrong")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            directory.resolve("ops", None),
            Err(AuthError::InvalidCredentials)
        ));
        let session = directory.resolve("ops", Some("k7#Qp9!x")).unwrap();
        assert_eq!(session.email.as_str(), "ops@school.edu");
    }

    #[test]
    fn test_account_debug_redacts_secret() {
        let directory = IdentityDirectory::from_json(
            r#"[{"identifier": "ops", "displayName": "Ops", "role": "systemAdmin", "secret": "hunter2-xyz"}]"#,
        )
        .unwrap();
        let debug = format!("{directory:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(directory.account_count(), 1);
    }

    #[test]
    fn test_display_name_from_local_part() {
        assert_eq!(display_name_from("emily.davis"), "Emily Davis");
        assert_eq!(display_name_from("school.admin+x"), "School Admin X");
    }
}
