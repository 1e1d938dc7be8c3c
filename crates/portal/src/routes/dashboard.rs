//! Landing pages for each role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use schoolcom_core::{NotificationStatus, Role, SchoolStatus, UserKind};
use tracing::instrument;

use crate::components::PageView;
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{
    PageContext, ParentOnly, RequireRole, SchoolAdminOnly, SystemAdminOnly, TeacherOnly,
};
use crate::models::notification::{history, inbox, unread_count};
use crate::models::{CalendarEvent, Notification};
use crate::state::AppState;

/// Items shown per dashboard list.
const LIST_LIMIT: usize = 5;

/// A headline number.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub href: &'static str,
}

#[derive(Debug, Clone)]
pub struct DashboardItem {
    pub title: String,
    pub meta: String,
    pub href: Option<String>,
    /// CSS modifier for an unread/status badge.
    pub badge: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardSection {
    pub title: String,
    pub items: Vec<DashboardItem>,
    pub empty: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageView,
    pub greeting: String,
    pub cards: Vec<StatCard>,
    pub sections: Vec<DashboardSection>,
}

fn card(t: &Translator, label_key: &str, value: usize, href: &'static str) -> StatCard {
    StatCard {
        label: t.t(label_key),
        value: value.to_string(),
        href,
    }
}

fn event_item(event: &CalendarEvent, t: &Translator) -> DashboardItem {
    let target = event.course_name.as_deref().unwrap_or(&event.audience);
    DashboardItem {
        title: event.title.clone(),
        meta: format!("{} · {} · {target}", event.date.format("%Y-%m-%d"), t.t(event.kind.label_key())),
        href: None,
        badge: Some(event.kind.as_str().to_owned()),
    }
}

fn sent_item(n: &Notification, t: &Translator) -> DashboardItem {
    DashboardItem {
        title: n.title.clone(),
        meta: format!("{} · {}", n.recipients, t.t(n.status.label_key())),
        href: None,
        badge: Some(n.status.as_str().to_owned()),
    }
}

fn upcoming<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    today: NaiveDate,
) -> Vec<&'a CalendarEvent> {
    let mut events: Vec<_> = events.into_iter().filter(|e| e.is_upcoming(today)).collect();
    events.sort_by_key(|e| e.date);
    events
}

fn section(t: &Translator, title_key: &str, items: Vec<DashboardItem>) -> DashboardSection {
    DashboardSection {
        title: t.t(title_key),
        items,
        empty: t.t("dashboard.nothing"),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn render(
    page: &PageContext,
    name: &str,
    cards: Vec<StatCard>,
    sections: Vec<DashboardSection>,
) -> Response {
    DashboardTemplate {
        page: page.view("dashboard.title"),
        greeting: page.t_with("dashboard.greeting", &[("name", name)]),
        cards,
        sections,
    }
    .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

#[instrument(skip_all)]
async fn system_admin(
    RequireRole { page, session, .. }: RequireRole<SystemAdminOnly>,
    State(state): State<AppState>,
) -> Response {
    let t = &page.translator;
    let data = state.data().await;
    let schools = data.schools.all();
    let count = |status: SchoolStatus| schools.iter().filter(|s| s.status == status).count();

    let cards = vec![
        card(t, "stats.schools", schools.len(), "/system-admin/schools"),
        card(t, "schoolStatus.active", count(SchoolStatus::Active), "/system-admin/schools"),
        card(t, "schoolStatus.pending", count(SchoolStatus::Pending), "/system-admin/schools"),
        StatCard {
            label: t.t("stats.users"),
            value: schools.iter().map(|s| u64::from(s.user_count)).sum::<u64>().to_string(),
            href: "/system-admin/stats",
        },
    ];
    let recent = schools
        .iter()
        .take(LIST_LIMIT)
        .map(|s| DashboardItem {
            title: s.name.clone(),
            meta: format!("{} · {}", s.admin_email, t.t(s.status.label_key())),
            href: Some(format!("/system-admin/schools/{}/edit", s.id)),
            badge: Some(s.status.as_str().to_owned()),
        })
        .collect();

    render(&page, &session.display_name, cards, vec![section(t, "dashboard.schools", recent)])
}

#[instrument(skip_all)]
async fn school_admin(
    RequireRole { page, session, .. }: RequireRole<SchoolAdminOnly>,
    State(state): State<AppState>,
) -> Response {
    let t = &page.translator;
    let data = state.data().await;
    let users = |kind: UserKind| data.users.all().iter().filter(|u| u.kind == kind).count();
    let events = upcoming(data.school_events.all(), today());

    let cards = vec![
        card(t, "nav.courses", data.courses.len(), "/school-admin/courses"),
        card(t, "users.tabs.students", users(UserKind::Student), "/school-admin/users?kind=student"),
        card(t, "users.tabs.teachers", users(UserKind::Teacher), "/school-admin/users?kind=teacher"),
        card(t, "dashboard.upcoming", events.len(), "/school-admin/calendar"),
    ];
    let sections = vec![
        section(
            t,
            "dashboard.upcoming",
            events.into_iter().take(LIST_LIMIT).map(|e| event_item(e, t)).collect(),
        ),
        section(
            t,
            "dashboard.recentNotifications",
            history(data.notifications.all(), Role::SchoolAdmin)
                .into_iter()
                .take(LIST_LIMIT)
                .map(|n| sent_item(n, t))
                .collect(),
        ),
    ];
    render(&page, &session.display_name, cards, sections)
}

#[instrument(skip_all)]
async fn teacher(
    RequireRole { page, session, .. }: RequireRole<TeacherOnly>,
    State(state): State<AppState>,
) -> Response {
    let t = &page.translator;
    let data = state.data().await;
    let events = upcoming(data.teacher_events.all(), today());
    let sent = history(data.notifications.all(), Role::Teacher);
    let drafts = sent
        .iter()
        .filter(|n| n.status == NotificationStatus::Draft)
        .count();

    let cards = vec![
        card(t, "nav.courses", data.courses.len(), "/teacher/courses"),
        card(t, "dashboard.upcoming", events.len(), "/teacher/calendar"),
        card(t, "nav.documents", data.documents.len(), "/teacher/documents"),
        card(t, "notificationStatus.draft", drafts, "/teacher/notifications"),
    ];
    let sections = vec![
        section(
            t,
            "dashboard.upcoming",
            events.into_iter().take(LIST_LIMIT).map(|e| event_item(e, t)).collect(),
        ),
        section(
            t,
            "dashboard.recentNotifications",
            sent.into_iter().take(LIST_LIMIT).map(|n| sent_item(n, t)).collect(),
        ),
    ];
    render(&page, &session.display_name, cards, sections)
}

#[instrument(skip_all)]
async fn parent(
    RequireRole { page, session, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
) -> Response {
    let t = &page.translator;
    let data = state.data().await;
    let notifications = data.notifications.all();
    let events = upcoming(data.all_events(), today());

    let cards = vec![
        card(t, "dashboard.unread", unread_count(notifications), "/parent/notifications"),
        card(t, "dashboard.upcoming", events.len(), "/parent/calendar"),
        card(
            t,
            "nav.documents",
            data.documents.all().iter().filter(|d| d.visible_to_parents).count(),
            "/parent/documents",
        ),
    ];
    let latest = inbox(notifications)
        .into_iter()
        .take(LIST_LIMIT)
        .map(|n| DashboardItem {
            title: n.title.clone(),
            meta: format!("{} · {}", n.sender, n.sent_at.format("%Y-%m-%d")),
            href: Some(format!("/parent/notifications/{}", n.id)),
            badge: (!n.read).then(|| "unread".to_owned()),
        })
        .collect();
    let sections = vec![
        section(t, "dashboard.latestNotifications", latest),
        section(
            t,
            "dashboard.upcoming",
            events.into_iter().take(LIST_LIMIT).map(|e| event_item(e, t)).collect(),
        ),
    ];
    render(&page, &session.display_name, cards, sections)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/system-admin", get(system_admin))
        .route("/school-admin", get(school_admin))
        .route("/teacher", get(teacher))
        .route("/parent", get(parent))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::PortalData;

    #[test]
    fn test_upcoming_is_sorted_and_skips_past_events() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap_or_default();
        let data = PortalData::seed_at(Utc::now(), today);
        let events = upcoming(data.all_events(), today);
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.date >= today));
        assert!(events.windows(2).all(|w| matches!(w, [a, b] if a.date <= b.date)));
    }
}
