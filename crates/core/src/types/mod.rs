//! Core types for SchoolCom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{IdGenerator, RecordId};
pub use language::Language;
pub use role::{Role, RoleParseError};
pub use status::*;
