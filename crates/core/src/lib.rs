//! SchoolCom Core - Shared types library.
//!
//! This crate provides common types used across all SchoolCom components:
//! - `portal` - The role-based web portal (system admin, school admin, teacher, parent)
//! - `cli` - Command-line tools for translations, identity lookups and AI drafts
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no network access and no
//! HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Roles, languages, record IDs, emails and record status enums
//! - [`storage`] - The key-value persistence contract used for sessions and preferences

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod storage;
pub mod types;

pub use storage::{KeyValueStore, MemoryStorage, StorageError};
pub use types::*;
