//! Platform usage statistics (system admin).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use schoolcom_core::{NotificationStatus, SchoolStatus, UserKind};
use tracing::instrument;

use crate::components::PageView;
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{RequireRole, SystemAdminOnly};
use crate::models::PortalData;
use crate::state::AppState;

/// Counts computed from the in-memory data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStats {
    pub schools_by_status: Vec<(SchoolStatus, usize)>,
    /// Sum of the schools' user counts.
    pub platform_users: u64,
    pub users_by_kind: Vec<(UserKind, usize)>,
    pub courses: usize,
    pub enrolled_students: u64,
    pub events: usize,
    pub documents: usize,
    pub notifications_by_status: Vec<(NotificationStatus, usize)>,
    pub replies: usize,
}

impl UsageStats {
    #[must_use]
    pub fn compute(data: &PortalData) -> Self {
        let schools = data.schools.all();
        let users = data.users.all();
        let notifications = data.notifications.all();

        Self {
            schools_by_status: SchoolStatus::ALL
                .iter()
                .map(|&s| (s, schools.iter().filter(|x| x.status == s).count()))
                .collect(),
            platform_users: schools.iter().map(|s| u64::from(s.user_count)).sum(),
            users_by_kind: UserKind::ALL
                .iter()
                .map(|&k| (k, users.iter().filter(|u| u.kind == k).count()))
                .collect(),
            courses: data.courses.len(),
            enrolled_students: data
                .courses
                .all()
                .iter()
                .map(|c| u64::from(c.student_count))
                .sum(),
            events: data.school_events.len() + data.teacher_events.len(),
            documents: data.documents.len(),
            notifications_by_status: NotificationStatus::ALL
                .iter()
                .map(|&s| (s, notifications.iter().filter(|n| n.status == s).count()))
                .collect(),
            replies: notifications.iter().map(|n| n.replies.len()).sum(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct StatGroup {
    pub title: String,
    pub rows: Vec<StatRow>,
}

fn row(label: String, value: impl ToString) -> StatRow {
    StatRow {
        label,
        value: value.to_string(),
    }
}

impl StatGroup {
    fn from_stats(stats: &UsageStats, t: &Translator) -> Vec<Self> {
        vec![
            Self {
                title: t.t("stats.schools"),
                rows: stats
                    .schools_by_status
                    .iter()
                    .map(|(s, n)| row(t.t(s.label_key()), n))
                    .chain(std::iter::once(row(t.t("stats.users"), stats.platform_users)))
                    .collect(),
            },
            Self {
                title: t.t("stats.people"),
                rows: stats
                    .users_by_kind
                    .iter()
                    .map(|(k, n)| row(t.t(k.label_key()), n))
                    .collect(),
            },
            Self {
                title: t.t("stats.teaching"),
                rows: vec![
                    row(t.t("nav.courses"), stats.courses),
                    row(t.t("stats.enrolled"), stats.enrolled_students),
                    row(t.t("nav.calendar"), stats.events),
                    row(t.t("nav.documents"), stats.documents),
                ],
            },
            Self {
                title: t.t("nav.notifications"),
                rows: stats
                    .notifications_by_status
                    .iter()
                    .map(|(s, n)| row(t.t(s.label_key()), n))
                    .chain(std::iter::once(row(t.t("stats.replies"), stats.replies)))
                    .collect(),
            },
        ]
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub page: PageView,
    pub groups: Vec<StatGroup>,
}

#[instrument(skip_all)]
pub async fn stats(
    RequireRole { page, .. }: RequireRole<SystemAdminOnly>,
    State(state): State<AppState>,
) -> Response {
    let stats = UsageStats::compute(&*state.data().await);
    StatsTemplate {
        groups: StatGroup::from_stats(&stats, &page.translator),
        page: page.view("stats.title"),
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    #[test]
    fn test_usage_stats_from_seed() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap_or_default();
        let data = PortalData::seed_at(Utc::now(), today);
        let stats = UsageStats::compute(&data);

        let schools: usize = stats.schools_by_status.iter().map(|(_, n)| n).sum();
        assert_eq!(schools, 4);
        assert_eq!(stats.courses, 4);
        assert_eq!(stats.enrolled_students, 28 + 25 + 22 + 30);
        assert_eq!(stats.events, 13);
        let notifications: usize = stats.notifications_by_status.iter().map(|(_, n)| n).sum();
        assert_eq!(notifications, 11);
        assert_eq!(stats.replies, 1);
    }
}
