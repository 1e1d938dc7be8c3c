//! Profile page for teachers and parents.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::components::{PageView, initials};
use crate::filters;
use crate::middleware::{AllowedRoles, RequireRole};

#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub page: PageView,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub role_label: String,
    pub language_label: String,
}

/// The signed-in identity and interface language.
#[instrument(skip_all)]
pub async fn profile<A: AllowedRoles>(RequireRole { page, session, .. }: RequireRole<A>) -> Response {
    ProfileTemplate {
        name: session.display_name.clone(),
        email: session.email.to_string(),
        initials: initials(&session.display_name),
        role_label: page.t(&format!("roles.{}", session.role.as_str())),
        language_label: page.t(&format!("language.{}", page.translator.language().code())),
        page: page.view("profile.title"),
    }
    .into_response()
}
