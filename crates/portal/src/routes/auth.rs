//! Sign-in and sign-out.
//!
//! The sign-in page lives at `/`. A visitor who is already signed in is
//! sent straight to their role's landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use schoolcom_core::Role;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use crate::auth::{self, AuthError};
use crate::components::PageView;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{CurrentPage, PageContext};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub identifier: String,
    /// Only checked for directory accounts that configure one.
    #[serde(default)]
    pub secret: String,
}

// =============================================================================
// Templates
// =============================================================================

/// A demo identifier shown under the form.
#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub identifier: &'static str,
    pub role_label: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageView,
    pub identifier: String,
    pub error: Option<String>,
    pub demo: Vec<DemoAccount>,
}

fn login_template(page: &PageContext, identifier: String, error: Option<String>) -> LoginTemplate {
    let demo = Role::ALL
        .iter()
        .map(|role| DemoAccount {
            identifier: match role {
                Role::SystemAdmin => "system.admin",
                Role::SchoolAdmin => "school.admin",
                Role::Teacher => "teacher",
                Role::Parent => "parent@example.com",
            },
            role_label: page.t(&format!("roles.{}", role.as_str())),
        })
        .collect();

    LoginTemplate {
        page: page.view("loginPage.title"),
        identifier,
        error,
        demo,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign-in page, or a redirect to the landing page when signed in.
#[instrument(skip_all)]
pub async fn login_page(CurrentPage(page): CurrentPage) -> Response {
    if let Some(session) = page.session() {
        return Redirect::to(session.role.landing_route()).into_response();
    }
    login_template(&page, String::new(), None).into_response()
}

/// Handle sign-in form submission.
#[instrument(skip_all)]
pub async fn login(
    CurrentPage(page): CurrentPage,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(storage) = page.storage.as_ref() else {
        return Err(AppError::Internal("session layer missing".to_string()));
    };
    let secret = SecretString::from(form.secret);
    let secret = Some(secret.expose_secret().trim()).filter(|s| !s.is_empty());

    match auth::login(storage, state.directory(), &form.identifier, secret).await {
        Ok(session) => {
            if let Err(e) = storage.session().cycle_id().await {
                tracing::warn!(error = %e, "failed to rotate session id");
            }
            set_sentry_user(&session);
            page.flash_success("loginPage.welcome", &[("name", &session.display_name)])
                .await;
            Ok(Redirect::to(session.role.landing_route()).into_response())
        }
        Err(e @ AuthError::Storage(_)) => Err(e.into()),
        Err(e) => {
            tracing::info!(error = %e, "sign-in rejected");
            let status = match e {
                AuthError::EmptyIdentifier => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::UNAUTHORIZED,
            };
            let template = login_template(&page, form.identifier, Some(page.t(e.message_key())));
            Ok((status, template).into_response())
        }
    }
}

/// Sign out and return to the sign-in page.
#[instrument(skip_all)]
pub async fn logout(CurrentPage(page): CurrentPage) -> Result<Response, AppError> {
    if let Some(storage) = &page.storage {
        auth::logout(storage).await?;
        tracing::info!("signed out");
        page.flash_success("loginPage.signedOut", &[]).await;
    }
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}
