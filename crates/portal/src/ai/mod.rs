//! AI text helper backed by the Anthropic Messages API.
//!
//! One request per user action, no retries. The portal runs without it:
//! when `CLAUDE_API_KEY` is unset every call fails with
//! [`GenerationError::Disabled`] and the compose page keeps the manual text.

pub mod client;
pub mod error;
pub mod notification;
pub mod types;

pub use client::ClaudeClient;
pub use error::{ClaudeError, GenerationError};
pub use notification::{NotificationTextInput, NotificationTextOutput, generate_notification_text};
