//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, HTTP transaction)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (record in span, tag Sentry, echo header)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)
//!
//! Role gating is not a layer: each handler asks for it with the
//! [`RequireRole`] extractor.

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AllowedRoles, Composers, CurrentPage, PageContext, ParentOnly, RequireRole, SchoolAdminOnly,
    SystemAdminOnly, TeacherOnly,
};
pub use flash::{Flash, FlashKind};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, SessionStorage, create_session_layer};
