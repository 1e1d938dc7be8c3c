//! Request context and role-gating extractors.
//!
//! Each request hydrates its session state and language from the
//! tower-sessions [`Session`] (through [`SessionStorage`]) and runs the pure
//! guard from [`crate::auth::guard`]. Handlers declare the roles they accept
//! with a marker type:
//!
//! ```rust,ignore
//! async fn dashboard(RequireRole { page, session, .. }: RequireRole<TeacherOnly>) -> Response {
//!     // only teachers get here
//! }
//! ```

use std::convert::Infallible;
use std::marker::PhantomData;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use schoolcom_core::Role;
use tower_sessions::Session as HttpSession;

use crate::auth::{GuardDecision, Session, SessionState, evaluate, hydrate};
use crate::components::PageView;
use crate::error::set_sentry_user;
use crate::filters;
use crate::i18n::{Translator, hydrate_language};
use crate::middleware::flash::{Flash, set_flash, take_flash};
use crate::middleware::session::SessionStorage;
use crate::state::AppState;

// =============================================================================
// Page Context
// =============================================================================

/// What every page handler knows about the request.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// `None` until the session layer has run.
    pub storage: Option<SessionStorage>,
    pub state: SessionState,
    pub translator: Translator,
    /// Flash left by the previous request, already taken out of the session.
    pub flash: Option<Flash>,
    pub path: String,
}

impl PageContext {
    async fn load(parts: &Parts, state: &AppState) -> Self {
        let storage = parts
            .extensions
            .get::<HttpSession>()
            .cloned()
            .map(SessionStorage::new);
        let default = state.config().default_language;

        let (session_state, language) = match &storage {
            Some(storage) => (
                SessionState::from(hydrate(storage).await),
                hydrate_language(storage, default).await,
            ),
            None => (SessionState::Loading, default),
        };

        Self {
            storage,
            state: session_state,
            translator: state.translator(language),
            flash: None,
            path: request_path(parts).to_owned(),
        }
    }

    async fn take_flash(&mut self) {
        if let Some(storage) = &self.storage {
            self.flash = take_flash(storage).await;
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    #[must_use]
    pub fn t_with(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        self.translator.t_with(key, replacements)
    }

    /// Layout data for a page titled by `title_key`.
    #[must_use]
    pub fn view(&self, title_key: &str) -> PageView {
        PageView::new(
            title_key,
            &self.path,
            self.session(),
            self.flash.clone(),
            self.translator.clone(),
        )
    }

    /// Queue a flash for the page the handler redirects to.
    pub async fn flash(&self, flash: Flash) {
        if let Some(storage) = &self.storage {
            set_flash(storage, &flash).await;
        }
    }

    pub async fn flash_success(&self, key: &str, replacements: &[(&str, &str)]) {
        self.flash(Flash::success(self.t_with(key, replacements))).await;
    }

    pub async fn flash_error(&self, key: &str) {
        self.flash(Flash::error(self.t(key))).await;
    }
}

/// Path as the client sent it; nested routers only see their suffix.
fn request_path(parts: &Parts) -> &str {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or_else(|| parts.uri.path(), |uri| uri.0.path())
}

/// Page context for routes open to everyone (sign-in, language switch).
pub struct CurrentPage(pub PageContext);

impl FromRequestParts<AppState> for CurrentPage {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut page = PageContext::load(parts, state).await;
        page.take_flash().await;
        Ok(Self(page))
    }
}

// =============================================================================
// Role Gating
// =============================================================================

/// The roles a page accepts.
pub trait AllowedRoles: Send + Sync + 'static {
    const ROLES: &'static [Role];
}

pub struct SystemAdminOnly;
pub struct SchoolAdminOnly;
pub struct TeacherOnly;
pub struct ParentOnly;
/// Roles that write notifications.
pub struct Composers;

impl AllowedRoles for SystemAdminOnly {
    const ROLES: &'static [Role] = &[Role::SystemAdmin];
}

impl AllowedRoles for SchoolAdminOnly {
    const ROLES: &'static [Role] = &[Role::SchoolAdmin];
}

impl AllowedRoles for TeacherOnly {
    const ROLES: &'static [Role] = &[Role::Teacher];
}

impl AllowedRoles for ParentOnly {
    const ROLES: &'static [Role] = &[Role::Parent];
}

impl AllowedRoles for Composers {
    const ROLES: &'static [Role] = &[Role::SchoolAdmin, Role::Teacher];
}

/// Extractor that admits only the roles of `A`.
///
/// Rejected visitors are sent to `/` (HTML) or get a 401 (`/api/` paths).
/// While the session is still unknown a loading page is shown instead.
pub struct RequireRole<A: AllowedRoles> {
    pub page: PageContext,
    pub session: Session,
    _roles: PhantomData<fn() -> A>,
}

/// Loading page shown while the session state is unknown.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub page: PageView,
}

/// Why a gated request was not admitted.
pub enum GuardRejection {
    Pending(Box<PageView>),
    Redirect(&'static str),
    Unauthorized,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Pending(page) => LoadingTemplate { page: *page }.into_response(),
            Self::Redirect(to) => Redirect::to(to).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<A: AllowedRoles> FromRequestParts<AppState> for RequireRole<A> {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut page = PageContext::load(parts, state).await;
        let is_api = page.path.starts_with("/api/");

        match evaluate(A::ROLES, &page.state) {
            GuardDecision::Allow => {}
            GuardDecision::Pending => {
                return Err(GuardRejection::Pending(Box::new(page.view("loading.title"))));
            }
            GuardDecision::Redirect(_) if is_api => return Err(GuardRejection::Unauthorized),
            GuardDecision::Redirect(to) => {
                tracing::debug!(path = %page.path, role = ?page.state.role(), "access denied");
                return Err(GuardRejection::Redirect(to));
            }
        }

        let Some(session) = page.session().cloned() else {
            return Err(GuardRejection::Redirect(crate::auth::guard::REJECT_PATH));
        };
        set_sentry_user(&session);
        page.take_flash().await;

        Ok(Self {
            page,
            session,
            _roles: PhantomData,
        })
    }
}
