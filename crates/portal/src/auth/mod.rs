//! Sign-in, session persistence and role gating.

pub mod directory;
pub mod error;
pub mod guard;
pub mod session;

pub use directory::{DirectoryError, IdentityDirectory};
pub use error::AuthError;
pub use guard::{GuardDecision, evaluate};
pub use session::{Session, SessionState, hydrate, login, logout};
