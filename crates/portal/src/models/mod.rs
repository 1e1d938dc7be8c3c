//! Portal records and the in-memory data set that holds them.
//!
//! Everything starts from seed data and lives for the life of the process.

pub mod course;
pub mod document;
pub mod event;
pub mod notification;
pub mod school;
pub mod user;

use chrono::{DateTime, NaiveDate, Utc};
use schoolcom_core::UserKind;

use crate::records::Collection;

pub use course::{Course, CourseDraft};
pub use document::{DocumentDraft, SharedDocument};
pub use event::{CalendarEvent, EventDraft, EventScope};
pub use notification::{ComposeAction, Notification, NotificationDraft};
pub use school::{School, SchoolDraft};
pub use user::{PortalUser, UserDraft};

/// Every collection the portal serves.
#[derive(Debug)]
pub struct PortalData {
    pub schools: Collection<School>,
    pub courses: Collection<Course>,
    pub users: Collection<PortalUser>,
    pub school_events: Collection<CalendarEvent>,
    pub teacher_events: Collection<CalendarEvent>,
    pub documents: Collection<SharedDocument>,
    pub notifications: Collection<Notification>,
}

impl PortalData {
    /// Seed data dated relative to the current time.
    #[must_use]
    pub fn seed() -> Self {
        let now = Utc::now();
        Self::seed_at(now, chrono::Local::now().date_naive())
    }

    /// Seed data dated relative to `now` and `today`.
    #[must_use]
    pub fn seed_at(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            schools: Collection::seeded(school::seed()),
            courses: Collection::seeded(course::seed()),
            users: Collection::seeded(user::seed()),
            school_events: Collection::seeded(event::seed_school(today)),
            teacher_events: Collection::seeded(event::seed_teacher(today)),
            documents: Collection::seeded(document::seed(now)),
            notifications: Collection::seeded(notification::seed(now)),
        }
    }

    /// Users a course can be assigned to.
    pub fn teachers(&self) -> impl Iterator<Item = &PortalUser> {
        self.users.all().iter().filter(|u| u.kind == UserKind::Teacher)
    }

    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.courses.all().iter().map(|c| c.name.as_str())
    }

    /// School and course events together, sorted by date.
    #[must_use]
    pub fn all_events(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<_> = self
            .school_events
            .all()
            .iter()
            .chain(self.teacher_events.all())
            .collect();
        events.sort_by_key(|e| e.date);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_counts() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap_or_default();
        let data = PortalData::seed_at(Utc::now(), today);
        assert_eq!(data.schools.len(), 4);
        assert_eq!(data.courses.len(), 4);
        assert_eq!(data.teachers().count(), 4);
        assert_eq!(data.all_events().len(), 13);
        assert_eq!(
            data.all_events()
                .iter()
                .filter(|e| e.is_upcoming(today))
                .count(),
            4
        );
    }

    #[test]
    fn test_course_names_match_teacher_calendar() {
        let data = PortalData::seed();
        let names: Vec<_> = data.course_names().collect();
        for event in data.teacher_events.all() {
            let course = event.course_name.as_deref().unwrap_or_default();
            assert!(course == event::ALL_STAFF || names.contains(&course), "{course}");
        }
    }
}
