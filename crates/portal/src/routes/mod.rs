//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              Sign-in page (landing page when signed in)
//! POST /login                         Sign in
//! POST /logout                        Sign out
//! POST /language                      Toggle language, return to `next`
//! GET  /health                        Liveness
//! GET  /api/health                    Health JSON
//!
//! # System admin
//! GET  /system-admin                  Dashboard
//!      /system-admin/schools          Record pages (see `crud`)
//! POST /system-admin/schools/{id}/visibility
//! GET  /system-admin/stats            Usage statistics
//!
//! # School admin
//! GET  /school-admin                  Dashboard
//!      /school-admin/courses          Record pages
//!      /school-admin/users            Record pages (?kind= tabs)
//!      /school-admin/calendar         Record pages
//! GET  /school-admin/notifications    Compose + history
//! POST /school-admin/notifications    Send, save draft or AI draft
//! POST /school-admin/notifications/{id}/delete
//!
//! # Teacher
//! GET  /teacher                       Dashboard
//!      /teacher/courses               Record pages (?kind= subject tabs)
//!      /teacher/calendar              Record pages
//!      /teacher/documents             Record pages
//! GET  /teacher/notifications         Compose + history (as above)
//! GET  /teacher/profile               Profile
//!
//! # Parent
//! GET  /parent                        Dashboard
//! GET  /parent/notifications          Inbox
//! GET  /parent/notifications/{id}     Detail (marks read)
//! POST /parent/notifications/{id}/reply
//! GET  /parent/calendar               Events
//! GET  /parent/documents              Documents shared with parents (?q=, ?type=)
//! GET  /parent/profile                Profile
//!
//! # AI
//! POST /api/notifications/generate    Notification text draft (JSON)
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod courses;
pub mod crud;
pub mod dashboard;
pub mod documents;
pub mod language;
pub mod notifications;
pub mod profile;
pub mod schools;
pub mod stats;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{ParentOnly, TeacherOnly};
use crate::state::AppState;

/// Build the portal router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Sign-in and preferences
        .route("/", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/language", post(language::toggle))
        // System admin
        .merge(schools::routes())
        .route("/system-admin/stats", get(stats::stats))
        // School admin
        .merge(courses::routes())
        .merge(users::routes())
        // Shared by roles
        .merge(dashboard::routes())
        .merge(calendar::routes())
        .merge(documents::routes())
        .merge(notifications::routes())
        .route("/teacher/profile", get(profile::profile::<TeacherOnly>))
        .route("/parent/profile", get(profile::profile::<ParentOnly>))
        // Health and JSON
        .merge(api::routes())
}
