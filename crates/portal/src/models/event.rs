//! Calendar events.
//!
//! School admins keep the institution calendar and teachers keep their
//! course calendars. Both are the same record type; the draft's
//! [`EventScope`] decides which kinds are allowed and whether a course is
//! required.

use chrono::NaiveDate;
use schoolcom_core::{EventKind, RecordId};

use crate::records::{FieldErrorKind, FormFields, Record, ValidationErrors};

/// Audiences a school-wide event can target.
pub const AUDIENCES: [&str; 17] = [
    "All",
    "All Students",
    "All Parents",
    "All Staff",
    "Teachers Only",
    "Grade 1",
    "Grade 2",
    "Grade 3",
    "Grade 4",
    "Grade 5",
    "Grade 6",
    "Grade 7",
    "Grade 8",
    "Grade 9",
    "Grade 10",
    "Grade 11",
    "Grade 12",
];

/// Course label for teacher events that concern every colleague.
pub const ALL_STAFF: &str = "All Staff";

/// Which calendar an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventScope {
    #[default]
    School,
    Teacher,
}

impl EventScope {
    #[must_use]
    pub const fn kinds(self) -> &'static [EventKind] {
        match self {
            Self::School => EventKind::SCHOOL,
            Self::Teacher => EventKind::TEACHER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub kind: EventKind,
    pub course_name: Option<String>,
    pub audience: String,
    pub institution_wide: bool,
}

impl CalendarEvent {
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub scope: EventScope,
    pub date: Option<NaiveDate>,
    pub title: String,
    pub description: String,
    pub kind: Option<EventKind>,
    pub course_name: Option<String>,
    pub audience: String,
    pub institution_wide: bool,
}

impl EventDraft {
    /// Read an event form. `courses` are the course names a teacher event may use.
    pub fn from_fields<'a>(
        scope: EventScope,
        fields: &FormFields,
        courses: impl IntoIterator<Item = &'a str>,
        errors: &mut ValidationErrors,
    ) -> Self {
        let kind = fields.choice::<EventKind>("kind", errors);
        if kind.is_some_and(|k| !scope.kinds().contains(&k)) {
            errors.add("kind", FieldErrorKind::InvalidChoice);
        }

        let (course_name, audience) = match scope {
            EventScope::Teacher => {
                let course = fields.optional("course_name");
                if let Some(name) = &course {
                    let known = name == ALL_STAFF || courses.into_iter().any(|c| c == name);
                    if !known {
                        errors.add("course_name", FieldErrorKind::InvalidChoice);
                    }
                }
                let audience = course.clone().unwrap_or_default();
                (course, audience)
            }
            EventScope::School => {
                let audience = fields.get("audience").unwrap_or(AUDIENCES[0]).to_owned();
                if !AUDIENCES.contains(&audience.as_str()) {
                    errors.add("audience", FieldErrorKind::InvalidChoice);
                }
                (None, audience)
            }
        };

        Self {
            scope,
            date: fields.date("date", errors),
            title: fields.text("title"),
            description: fields.text("description"),
            kind,
            course_name,
            audience,
            institution_wide: scope == EventScope::School && fields.checkbox("institution_wide"),
        }
    }

    fn required(&self) -> Result<(NaiveDate, EventKind), ValidationErrors> {
        let date = self.date.ok_or_else(|| ValidationErrors::required("date"))?;
        let kind = self.kind.ok_or_else(|| ValidationErrors::required("kind"))?;
        Ok((date, kind))
    }
}

impl Record for CalendarEvent {
    type Draft = EventDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.course_name.as_deref());
        fields
    }

    fn validate(draft: &EventDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &draft.title);
        errors.require_some("date", draft.date.as_ref());
        errors.require_some("kind", draft.kind.as_ref());
        if draft.scope == EventScope::Teacher {
            errors.require_some("course_name", draft.course_name.as_ref());
        }
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: EventDraft) -> Result<Self, ValidationErrors> {
        let (date, kind) = draft.required()?;
        Ok(Self {
            id,
            date,
            title: draft.title,
            description: draft.description,
            kind,
            course_name: draft.course_name,
            audience: draft.audience,
            institution_wide: draft.institution_wide,
        })
    }

    fn apply(&mut self, draft: EventDraft) -> Result<(), ValidationErrors> {
        let (date, kind) = draft.required()?;
        self.date = date;
        self.kind = kind;
        self.title = draft.title;
        self.description = draft.description;
        self.course_name = draft.course_name;
        self.audience = draft.audience;
        self.institution_wide = draft.institution_wide;
        Ok(())
    }
}

struct Seed<'a> {
    id: &'a str,
    date: Option<NaiveDate>,
    title: &'a str,
    description: &'a str,
    kind: EventKind,
    course: Option<&'a str>,
    audience: &'a str,
    institution_wide: bool,
}

impl Seed<'_> {
    fn build(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            id: RecordId::from(self.id),
            date: self.date?,
            title: self.title.to_string(),
            description: self.description.to_string(),
            kind: self.kind,
            course_name: self.course.map(str::to_string),
            audience: self.audience.to_string(),
            institution_wide: self.institution_wide,
        })
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Institution calendar, with two entries on `today`.
#[must_use]
pub fn seed_school(today: NaiveDate) -> Vec<CalendarEvent> {
    [
        Seed {
            id: "sch1",
            date: ymd(2023, 9, 1),
            title: "School Re-opens",
            description: "First day of the new academic year.",
            kind: EventKind::SchoolEvent,
            course: None,
            audience: "All",
            institution_wide: true,
        },
        Seed {
            id: "sch2",
            date: ymd(2023, 10, 20),
            title: "Parent-Teacher Conference",
            description: "Meetings for all grades.",
            kind: EventKind::Meeting,
            course: None,
            audience: "All Parents",
            institution_wide: true,
        },
        Seed {
            id: "sch3",
            date: ymd(2023, 12, 15),
            title: "Mid-Term Exams Start",
            description: "Exam period for Grades 9-12.",
            kind: EventKind::ExamPeriod,
            course: None,
            audience: "All Students",
            institution_wide: false,
        },
        Seed {
            id: "sch4",
            date: ymd(2023, 12, 22),
            title: "Winter Break Begins",
            description: "School closed for winter holidays.",
            kind: EventKind::Holiday,
            course: None,
            audience: "All",
            institution_wide: true,
        },
        Seed {
            id: "sch5",
            date: Some(today),
            title: "Staff Meeting",
            description: "Agenda: Upcoming school fair.",
            kind: EventKind::Meeting,
            course: None,
            audience: "All Staff",
            institution_wide: false,
        },
        Seed {
            id: "sch6",
            date: Some(today),
            title: "Reminder: Sports Day Sign-ups",
            description: "Last day to sign up for Sports Day events.",
            kind: EventKind::Reminder,
            course: None,
            audience: "All Students",
            institution_wide: true,
        },
    ]
    .into_iter()
    .filter_map(Seed::build)
    .collect()
}

/// Course calendar, with two entries on `today`.
#[must_use]
pub fn seed_teacher(today: NaiveDate) -> Vec<CalendarEvent> {
    [
        Seed {
            id: "t1",
            date: ymd(2023, 9, 25),
            title: "Algebra Test",
            description: "Covering chapters 1-3.",
            kind: EventKind::Exam,
            course: Some("Algebra I"),
            audience: "Algebra I",
            institution_wide: false,
        },
        Seed {
            id: "t2",
            date: ymd(2023, 9, 27),
            title: "Physics Lab Prep",
            description: "Read lab manual pages 10-15.",
            kind: EventKind::Homework,
            course: Some("Introduction to Physics"),
            audience: "Introduction to Physics",
            institution_wide: false,
        },
        Seed {
            id: "t3",
            date: ymd(2023, 9, 29),
            title: "Guest Speaker: Poet",
            description: "Special session on modern poetry.",
            kind: EventKind::Lesson,
            course: Some("English Literature"),
            audience: "English Literature",
            institution_wide: false,
        },
        Seed {
            id: "t4",
            date: ymd(2023, 10, 2),
            title: "Project Deadline Reminder",
            description: "Geometry projects are due next Monday.",
            kind: EventKind::Reminder,
            course: Some("Algebra I"),
            audience: "Algebra I",
            institution_wide: false,
        },
        Seed {
            id: "t5",
            date: ymd(2023, 10, 5),
            title: "Faculty Meeting",
            description: "Discuss curriculum updates.",
            kind: EventKind::Meeting,
            course: Some(ALL_STAFF),
            audience: ALL_STAFF,
            institution_wide: false,
        },
        Seed {
            id: "t6",
            date: Some(today),
            title: "Review Session",
            description: "Q&A for upcoming test.",
            kind: EventKind::Lesson,
            course: Some("Algebra I"),
            audience: "Algebra I",
            institution_wide: false,
        },
        Seed {
            id: "t7",
            date: Some(today),
            title: "Homework Collection",
            description: "Submit Newton's Laws worksheet.",
            kind: EventKind::Homework,
            course: Some("Introduction to Physics"),
            audience: "Introduction to Physics",
            institution_wide: false,
        },
    ]
    .into_iter()
    .filter_map(Seed::build)
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::Collection;

    const COURSES: [&str; 2] = ["Algebra I", "English Literature"];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn test_seeds_are_complete() {
        assert_eq!(seed_school(today()).len(), 6);
        assert_eq!(seed_teacher(today()).len(), 7);
        assert_eq!(
            seed_teacher(today())
                .iter()
                .filter(|e| e.is_upcoming(today()))
                .count(),
            2
        );
    }

    #[test]
    fn test_teacher_event_needs_course() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("title", "Quiz")
            .with("date", "2024-05-10")
            .with("kind", "exam");
        let draft = EventDraft::from_fields(EventScope::Teacher, &fields, COURSES, &mut errors);
        assert!(errors.is_empty());
        let err = CalendarEvent::validate(&draft).unwrap_err();
        assert_eq!(err.for_field("course_name"), Some(FieldErrorKind::Required));
    }

    #[test]
    fn test_kind_must_fit_the_calendar() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("title", "Winter Break")
            .with("date", "2024-12-20")
            .with("kind", "holiday")
            .with("course_name", "Algebra I");
        EventDraft::from_fields(EventScope::Teacher, &fields, COURSES, &mut errors);
        assert_eq!(errors.for_field("kind"), Some(FieldErrorKind::InvalidChoice));

        let mut errors = ValidationErrors::new();
        let draft = EventDraft::from_fields(EventScope::School, &fields, COURSES, &mut errors);
        assert!(errors.is_empty());
        assert_eq!(draft.audience, "All");
        assert_eq!(draft.course_name, None);
    }

    #[test]
    fn test_unknown_course_is_rejected() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new().with("course_name", "Basket Weaving");
        EventDraft::from_fields(EventScope::Teacher, &fields, COURSES, &mut errors);
        assert_eq!(
            errors.for_field("course_name"),
            Some(FieldErrorKind::InvalidChoice)
        );
    }

    #[test]
    fn test_create_then_edit_event() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("title", "Open Day")
            .with("date", "2024-06-01")
            .with("kind", "school_event")
            .with("audience", "All Parents")
            .with("institution_wide", "on");
        let draft = EventDraft::from_fields(EventScope::School, &fields, COURSES, &mut errors);
        let mut events = Collection::seeded(seed_school(today()));
        let id = events.create(draft).unwrap().id.clone();
        assert_eq!(events.all().last().unwrap().id, id);

        let fields = fields.with("title", "Open Day (moved)").with("date", "2024-06-08");
        let draft = EventDraft::from_fields(EventScope::School, &fields, COURSES, &mut errors);
        let updated = events.update(&id, draft).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "Open Day (moved)");
        assert!(updated.institution_wide);
    }
}
