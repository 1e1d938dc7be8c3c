//! Notification pages.
//!
//! School admins and teachers compose notifications and keep a history of
//! what they wrote; parents read the sent ones in their inbox and reply.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use schoolcom_core::{NotificationKind, NotificationStatus, RecordId, Role};
use serde::Deserialize;
use tracing::instrument;

use crate::ai::{NotificationTextInput, generate_notification_text};
use crate::auth::Session;
use crate::components::{FieldKind, FieldSpec, FormView, PageView};
use crate::error::AppError;
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{
    AllowedRoles, Flash, PageContext, ParentOnly, RequireRole, SchoolAdminOnly, TeacherOnly,
};
use crate::models::event::AUDIENCES;
use crate::models::notification::{history, inbox};
use crate::models::{ComposeAction, Notification, NotificationDraft, PortalData};
use crate::records::{FormFields, Record, RecordError, ValidationErrors};
use crate::state::AppState;

const INBOX: &str = "/parent/notifications";

/// Audience covering the whole school.
pub const ALL_SCHOOL: &str = "All School";

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Where `role` keeps its compose page.
fn compose_base(role: Role) -> String {
    format!("{}/notifications", role.landing_route())
}

/// Recipients `role` may address: school audiences for school admins,
/// course names for teachers.
#[must_use]
pub fn targets(role: Role, data: &PortalData) -> Vec<String> {
    match role {
        Role::Teacher => data.course_names().map(str::to_owned).collect(),
        _ => std::iter::once(ALL_SCHOOL)
            .chain(AUDIENCES.iter().copied().filter(|a| *a != "All"))
            .map(str::to_owned)
            .collect(),
    }
}

// =============================================================================
// Compose
// =============================================================================

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: String,
    pub title: String,
    pub recipients: String,
    pub kind_label: String,
    pub status: &'static str,
    pub status_label: String,
    pub sent_at: String,
    pub deletable: bool,
}

impl HistoryRow {
    fn new(n: &Notification, session: &Session, t: &Translator) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            recipients: n.recipients.clone(),
            kind_label: t.t(n.kind.label_key()),
            status: n.status.as_str(),
            status_label: t.t(n.status.label_key()),
            sent_at: format_time(n.sent_at),
            deletable: n.delete_blocker().is_none()
                && n.is_written_by(session.role, &session.display_name),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "notifications/compose.html")]
pub struct ComposeTemplate {
    pub page: PageView,
    pub base: String,
    pub form: FormView,
    /// Inline result of the AI draft button.
    pub notice: Option<Flash>,
    pub ai_enabled: bool,
    pub history: Vec<HistoryRow>,
}

fn compose_fields(targets: &[String]) -> Vec<FieldSpec> {
    let recipients = FieldSpec::options_from(targets.iter().map(String::as_str));
    vec![
        FieldSpec::new("title", "fields.title", FieldKind::Text).required(),
        FieldSpec::new(
            "kind",
            "fields.notification_kind",
            FieldSpec::options_keyed(
                NotificationKind::ALL,
                NotificationKind::as_str,
                NotificationKind::label_key,
            ),
        ),
        FieldSpec::new("recipients", "fields.recipients", recipients).required(),
        FieldSpec::new("content", "fields.content", FieldKind::Textarea).required(),
    ]
}

struct ComposeState<'a> {
    values: &'a FormFields,
    errors: &'a ValidationErrors,
    notice: Option<Flash>,
    status: StatusCode,
}

fn compose_response(
    page: &PageContext,
    session: &Session,
    state: &AppState,
    data: &PortalData,
    compose: ComposeState<'_>,
) -> Response {
    let t = &page.translator;
    let base = compose_base(session.role);
    let specs = compose_fields(&targets(session.role, data));
    let template = ComposeTemplate {
        page: page.view("notifications.title"),
        form: FormView {
            action: base.clone(),
            cancel_href: "",
            fields: FormView::build(&specs, compose.values, compose.errors, false, t),
            submit_label: t.t("notifications.send"),
            general_errors: FormView::unplaced_errors(&specs, compose.errors, t),
        },
        base,
        notice: compose.notice,
        ai_enabled: state.claude().is_some(),
        history: history(data.notifications.all(), session.role)
            .into_iter()
            .map(|n| HistoryRow::new(n, session, t))
            .collect(),
    };
    (compose.status, template).into_response()
}

#[instrument(skip_all, fields(role = %session.role))]
async fn compose_page<A: AllowedRoles>(
    RequireRole { page, session, .. }: RequireRole<A>,
    State(state): State<AppState>,
) -> Response {
    let values = FormFields::new();
    let errors = ValidationErrors::new();
    let data = state.data().await;
    let compose = ComposeState {
        values: &values,
        errors: &errors,
        notice: None,
        status: StatusCode::OK,
    };
    compose_response(&page, &session, &state, &data, compose)
}

/// Handles the three compose buttons: send, save as draft, AI draft.
#[instrument(skip_all, fields(role = %session.role))]
async fn compose_submit<A: AllowedRoles>(
    RequireRole { page, session, .. }: RequireRole<A>,
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Result<Response, AppError> {
    let action = fields.text("action");
    match action.as_str() {
        "generate" => Ok(generate_draft(&page, &session, &state, fields).await),
        "draft" => save(&page, &session, &state, ComposeAction::SaveDraft, &fields).await,
        _ => save(&page, &session, &state, ComposeAction::Send, &fields).await,
    }
}

async fn save(
    page: &PageContext,
    session: &Session,
    state: &AppState,
    action: ComposeAction,
    fields: &FormFields,
) -> Result<Response, AppError> {
    let mut data = state.data_mut().await;
    let allowed = targets(session.role, &data);
    let mut errors = ValidationErrors::new();
    let draft = NotificationDraft::from_fields(
        action,
        fields,
        allowed.iter().map(String::as_str),
        (&session.display_name, session.role),
        &mut errors,
    );
    if let Err(more) = Notification::validate(&draft) {
        errors.merge(more);
    }

    let outcome = if errors.is_empty() {
        data.notifications.create(draft).map(|n| n.title.clone())
    } else {
        Err(RecordError::Validation(errors))
    };
    let title = match outcome {
        Ok(title) => title,
        Err(RecordError::Validation(errors)) => {
            let compose = ComposeState {
                values: fields,
                errors: &errors,
                notice: None,
                status: StatusCode::UNPROCESSABLE_ENTITY,
            };
            return Ok(compose_response(page, session, state, &data, compose));
        }
        Err(e) => return Err(e.into()),
    };
    drop(data);

    tracing::info!(?action, "notification stored");
    let key = match action {
        ComposeAction::Send => "notifications.sent",
        ComposeAction::SaveDraft => "notifications.draftSaved",
    };
    page.flash_success(key, &[("title", &title)]).await;
    Ok(Redirect::to(&compose_base(session.role)).into_response())
}

/// Ask the AI helper for the content; the entered text stays on failure.
async fn generate_draft(
    page: &PageContext,
    session: &Session,
    state: &AppState,
    mut fields: FormFields,
) -> Response {
    let input = NotificationTextInput {
        event_title: fields.text("title"),
        event_description: fields.text("content"),
        event_type: fields.text("kind"),
        course_name: fields.text("recipients"),
        school_name: state.config().school_name.clone(),
    };

    let (notice, status) = match generate_notification_text(state.claude(), &input).await {
        Ok(output) => {
            fields.set("content", output.notification_text);
            (Flash::success(page.t("notifications.ai.generated")), StatusCode::OK)
        }
        Err(e) => {
            let message = page.t(e.message_key());
            let status = AppError::Generation(e).status();
            (Flash::error(message), status)
        }
    };

    let errors = ValidationErrors::new();
    let data = state.data().await;
    let compose = ComposeState {
        values: &fields,
        errors: &errors,
        notice: Some(notice),
        status,
    };
    compose_response(page, session, state, &data, compose)
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_notification<A: AllowedRoles>(
    RequireRole { page, session, .. }: RequireRole<A>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId::from(id);
    let outcome = {
        let mut data = state.data_mut().await;
        let own = data
            .notifications
            .get(&id)
            .is_some_and(|n| n.is_written_by(session.role, &session.display_name));
        if own {
            data.notifications.delete(&id).map(|n| n.title)
        } else {
            Err(RecordError::NotFound(id))
        }
    };

    match outcome {
        Ok(title) => {
            tracing::info!("notification deleted");
            page.flash_success("records.deleted", &[("name", &title)]).await;
        }
        Err(RecordError::Precondition(reason)) => page.flash_error(reason).await,
        Err(_) => page.flash_error("records.notFound").await,
    }
    Redirect::to(&compose_base(session.role)).into_response()
}

// =============================================================================
// Parent inbox
// =============================================================================

#[derive(Debug, Clone)]
pub struct InboxRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub sender: String,
    pub kind: &'static str,
    pub kind_label: String,
    pub child_name: Option<String>,
    pub sent_at: String,
    pub read: bool,
    pub reply_count: usize,
}

impl InboxRow {
    fn new(n: &Notification, t: &Translator) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            content: n.content.clone(),
            sender: n.sender.clone(),
            kind: n.kind.as_str(),
            kind_label: t.t(n.kind.label_key()),
            child_name: n.child_name.clone(),
            sent_at: format_time(n.sent_at),
            read: n.read,
            reply_count: n.replies.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplyView {
    pub author: String,
    pub text: String,
    pub sent_at: String,
    pub from_parent: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "parent/inbox.html")]
pub struct InboxTemplate {
    pub page: PageView,
    pub rows: Vec<InboxRow>,
    pub unread: usize,
}

#[derive(Template, WebTemplate)]
#[template(path = "parent/notification.html")]
pub struct NotificationDetailTemplate {
    pub page: PageView,
    pub notification: InboxRow,
    pub recipients: String,
    pub replies: Vec<ReplyView>,
}

#[instrument(skip_all)]
async fn parent_inbox(
    RequireRole { page, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
) -> Response {
    let data = state.data().await;
    let rows: Vec<_> = inbox(data.notifications.all())
        .into_iter()
        .map(|n| InboxRow::new(n, &page.translator))
        .collect();
    let unread = rows.iter().filter(|r| !r.read).count();

    InboxTemplate {
        page: page.view("notifications.inbox"),
        rows,
        unread,
    }
    .into_response()
}

/// Open a notification and mark it read.
#[instrument(skip_all, fields(id = %id))]
async fn parent_detail(
    RequireRole { page, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId::from(id);
    let t = &page.translator;
    let template = state
        .data_mut()
        .await
        .notifications
        .get_mut(&id)
        .filter(|n| n.status == NotificationStatus::Sent)
        .map(|notification| {
            if notification.mark_read() {
                tracing::debug!("notification marked read");
            }
            NotificationDetailTemplate {
                page: page.view("notifications.detail"),
                notification: InboxRow::new(notification, t),
                recipients: notification.recipients.clone(),
                replies: notification
                    .replies
                    .iter()
                    .map(|r| ReplyView {
                        author: r.author.clone(),
                        text: r.text.clone(),
                        sent_at: format_time(r.sent_at),
                        from_parent: r.from_parent,
                    })
                    .collect(),
            }
        });

    if let Some(template) = template {
        return template.into_response();
    }
    page.flash_error("records.notFound").await;
    Redirect::to(INBOX).into_response()
}

#[derive(Debug, Deserialize)]
struct ReplyForm {
    #[serde(default)]
    text: String,
}

#[instrument(skip_all, fields(id = %id))]
async fn parent_reply(
    RequireRole { page, session, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ReplyForm>,
) -> Response {
    let record_id = RecordId::from(id.as_str());
    let added = state
        .data_mut()
        .await
        .notifications
        .get_mut(&record_id)
        .filter(|n| n.status == NotificationStatus::Sent)
        .map(|n| n.add_reply(&session.display_name, &form.text, Utc::now()));

    match added {
        Some(true) => {
            tracing::info!("reply added");
            page.flash_success("notifications.replySent", &[]).await;
        }
        Some(false) => page.flash_error("notifications.replyEmpty").await,
        None => {
            page.flash_error("records.notFound").await;
            return Redirect::to(INBOX).into_response();
        }
    }
    Redirect::to(&format!("{INBOX}/{id}")).into_response()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/school-admin/notifications",
            get(compose_page::<SchoolAdminOnly>).post(compose_submit::<SchoolAdminOnly>),
        )
        .route(
            "/school-admin/notifications/{id}/delete",
            post(delete_notification::<SchoolAdminOnly>),
        )
        .route(
            "/teacher/notifications",
            get(compose_page::<TeacherOnly>).post(compose_submit::<TeacherOnly>),
        )
        .route(
            "/teacher/notifications/{id}/delete",
            post(delete_notification::<TeacherOnly>),
        )
        .route(INBOX, get(parent_inbox))
        .route("/parent/notifications/{id}", get(parent_detail))
        .route("/parent/notifications/{id}/reply", post(parent_reply))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn data() -> PortalData {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap_or_default();
        PortalData::seed_at(Utc::now(), today)
    }

    #[test]
    fn test_teachers_address_courses() {
        let data = data();
        let teacher = targets(Role::Teacher, &data);
        assert_eq!(teacher.len(), data.courses.len());
        assert!(teacher.iter().any(|t| t == "Algebra I"));
    }

    #[test]
    fn test_school_admins_address_audiences() {
        let school = targets(Role::SchoolAdmin, &data());
        assert_eq!(school.first().map(String::as_str), Some(ALL_SCHOOL));
        assert!(school.iter().any(|t| t == "Grade 2"));
        assert!(!school.iter().any(|t| t == "All"));
    }

    #[test]
    fn test_compose_base() {
        assert_eq!(compose_base(Role::Teacher), "/teacher/notifications");
        assert_eq!(compose_base(Role::SchoolAdmin), "/school-admin/notifications");
    }
}
