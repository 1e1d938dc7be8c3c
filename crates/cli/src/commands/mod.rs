//! Subcommand implementations.

pub mod draft;
pub mod i18n;
pub mod whoami;
