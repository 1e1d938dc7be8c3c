//! Resolve an identifier the way the sign-in form does.

use schoolcom_portal::auth::{AuthError, DirectoryError, IdentityDirectory};
use schoolcom_portal::config::{ConfigError, PortalConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhoamiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Account table error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Sign-in rejected: {0}")]
    Auth(#[from] AuthError),
}

/// Print the role, identity and landing page `identifier` signs in as.
///
/// Reads `PORTAL_ACCOUNTS` like the portal does.
///
/// # Errors
///
/// Returns `WhoamiError` if configuration or the account table cannot be
/// loaded, or the identifier is rejected.
#[allow(clippy::print_stdout)]
pub fn whoami(identifier: &str, secret: Option<&str>) -> Result<(), WhoamiError> {
    let config = PortalConfig::from_env()?;
    let directory = match &config.accounts_path {
        Some(path) => IdentityDirectory::from_file(path)?,
        None => IdentityDirectory::new(),
    };

    let session = directory.resolve(identifier, secret)?;
    println!("role:    {}", session.role);
    println!("name:    {}", session.display_name);
    println!("email:   {}", session.email);
    println!("landing: {}", session.role.landing_route());
    Ok(())
}
