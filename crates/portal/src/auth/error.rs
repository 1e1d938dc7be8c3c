//! Authentication error types.

use schoolcom_core::StorageError;
use thiserror::Error;

/// Errors that can occur while signing in or out.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identifier was blank.
    #[error("an identifier is required")]
    EmptyIdentifier,

    /// No account or prefix rule matched, or the secret was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Translation key shown to the user on the sign-in page.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "loginPage.errors.identifierRequired",
            Self::InvalidCredentials => "loginPage.errors.invalidCredentials",
            Self::Storage(_) => "loginPage.errors.unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid credentials");
        assert_eq!(
            AuthError::EmptyIdentifier.message_key(),
            "loginPage.errors.identifierRequired"
        );
    }
}
