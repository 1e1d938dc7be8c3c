//! Students, teachers and staff managed by a school admin.

use chrono::NaiveDate;
use schoolcom_core::{Email, RecordId, UserKind, UserStatus};

use crate::records::{FormFields, Placement, Record, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalUser {
    pub id: RecordId,
    pub name: String,
    pub email: Email,
    pub kind: UserKind,
    pub status: UserStatus,
    /// Students only.
    pub grade: Option<String>,
    /// Teachers only.
    pub subject: Option<String>,
    /// Staff only.
    pub department: Option<String>,
    pub last_login: Option<NaiveDate>,
}

impl PortalUser {
    /// The kind-specific detail (grade, subject or department).
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self.kind {
            UserKind::Student => self.grade.as_deref(),
            UserKind::Teacher => self.subject.as_deref(),
            UserKind::Staff => self.department.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub name: String,
    pub email: Option<Email>,
    pub kind: Option<UserKind>,
    pub status: Option<UserStatus>,
    pub grade: Option<String>,
    pub subject: Option<String>,
    pub department: Option<String>,
}

impl UserDraft {
    pub fn from_fields(fields: &FormFields, errors: &mut ValidationErrors) -> Self {
        Self {
            name: fields.text("name"),
            email: fields.email("email", errors),
            kind: fields.choice("kind", errors),
            status: fields.choice("status", errors),
            grade: fields.optional("grade"),
            subject: fields.optional("subject"),
            department: fields.optional("department"),
        }
    }

    /// Keep only the detail that belongs to the chosen kind.
    fn details(&self, kind: UserKind) -> (Option<String>, Option<String>, Option<String>) {
        match kind {
            UserKind::Student => (self.grade.clone(), None, None),
            UserKind::Teacher => (None, self.subject.clone(), None),
            UserKind::Staff => (None, None, self.department.clone()),
        }
    }
}

impl Record for PortalUser {
    type Draft = UserDraft;

    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, self.email.as_str()]
    }

    fn validate(draft: &UserDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &draft.name);
        errors.require_some("email", draft.email.as_ref());
        errors.require_some("kind", draft.kind.as_ref());
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: UserDraft) -> Result<Self, ValidationErrors> {
        let kind = draft.kind.ok_or_else(|| ValidationErrors::required("kind"))?;
        let (grade, subject, department) = draft.details(kind);
        let email = draft.email.ok_or_else(|| ValidationErrors::required("email"))?;
        Ok(Self {
            id,
            name: draft.name,
            email,
            kind,
            status: draft.status.unwrap_or(UserStatus::Invited),
            grade,
            subject,
            department,
            last_login: None,
        })
    }

    fn apply(&mut self, draft: UserDraft) -> Result<(), ValidationErrors> {
        let kind = draft.kind.ok_or_else(|| ValidationErrors::required("kind"))?;
        let (grade, subject, department) = draft.details(kind);
        self.email = draft.email.ok_or_else(|| ValidationErrors::required("email"))?;
        self.name = draft.name;
        self.kind = kind;
        if let Some(status) = draft.status {
            self.status = status;
        }
        self.grade = grade;
        self.subject = subject;
        self.department = department;
        Ok(())
    }
}

struct Seed<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    kind: UserKind,
    status: UserStatus,
    detail: &'a str,
    last_login: Option<(i32, u32, u32)>,
}

impl Seed<'_> {
    fn build(self) -> Option<PortalUser> {
        let detail = Some(self.detail.to_string());
        let (grade, subject, department) = match self.kind {
            UserKind::Student => (detail, None, None),
            UserKind::Teacher => (None, detail, None),
            UserKind::Staff => (None, None, detail),
        };
        Some(PortalUser {
            id: RecordId::from(self.id),
            name: self.name.to_string(),
            email: Email::parse(self.email).ok()?,
            kind: self.kind,
            status: self.status,
            grade,
            subject,
            department,
            last_login: self
                .last_login
                .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        })
    }
}

#[must_use]
pub fn seed() -> Vec<PortalUser> {
    use UserKind::{Staff, Student, Teacher};
    use UserStatus::{Active, Inactive, Invited};

    [
        Seed {
            id: "s1",
            name: "Alice Wonderland",
            email: "alice@example.com",
            kind: Student,
            status: Active,
            detail: "Grade 9",
            last_login: Some((2023, 10, 25)),
        },
        Seed {
            id: "s2",
            name: "Bob The Builder",
            email: "bob@example.com",
            kind: Student,
            status: Active,
            detail: "Grade 10",
            last_login: Some((2023, 10, 24)),
        },
        Seed {
            id: "s3",
            name: "Charlie Brown",
            email: "charlie@example.com",
            kind: Student,
            status: Invited,
            detail: "Grade 9",
            last_login: None,
        },
        Seed {
            id: "t1",
            name: "Emily Davis",
            email: "emily.davis@example.com",
            kind: Teacher,
            status: Active,
            detail: "Mathematics",
            last_login: Some((2023, 10, 26)),
        },
        Seed {
            id: "t2",
            name: "John Carter",
            email: "john.carter@example.com",
            kind: Teacher,
            status: Active,
            detail: "Social Studies",
            last_login: Some((2023, 10, 25)),
        },
        Seed {
            id: "t3",
            name: "Sarah Lee",
            email: "sarah.lee@example.com",
            kind: Teacher,
            status: Active,
            detail: "Science",
            last_login: Some((2023, 10, 23)),
        },
        Seed {
            id: "t4",
            name: "Olivia Chen",
            email: "olivia.chen@example.com",
            kind: Teacher,
            status: Invited,
            detail: "English",
            last_login: None,
        },
        Seed {
            id: "st1",
            name: "Admin User",
            email: "admin@example.com",
            kind: Staff,
            status: Active,
            detail: "Administration",
            last_login: Some((2023, 10, 26)),
        },
        Seed {
            id: "st2",
            name: "Support Staff",
            email: "support@example.com",
            kind: Staff,
            status: Inactive,
            detail: "IT Support",
            last_login: None,
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
    use crate::records::{Collection, FieldErrorKind};

    #[test]
    fn test_seed_is_complete() {
        let users = seed();
        assert_eq!(users.len(), 9);
        assert_eq!(
            users.iter().filter(|u| u.kind == UserKind::Teacher).count(),
            4
        );
    }

    #[test]
    fn test_only_the_kind_detail_is_kept() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("name", "Dana Scully")
            .with("email", "dana@example.com")
            .with("kind", "staff")
            .with("grade", "Grade 3")
            .with("department", "Science Office");
        let draft = UserDraft::from_fields(&fields, &mut errors);

        let mut users = Collection::seeded(seed());
        let created = users.create(draft).unwrap();
        assert_eq!(created.status, UserStatus::Invited);
        assert_eq!(created.grade, None);
        assert_eq!(created.detail(), Some("Science Office"));
        assert_eq!(users.all().first().unwrap().name, "Dana Scully");
    }

    #[test]
    fn test_bad_email_is_reported_once() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new().with("name", "X").with("email", "not-an-email");
        let draft = UserDraft::from_fields(&fields, &mut errors);
        if let Err(more) = PortalUser::validate(&draft) {
            errors.merge(more);
        }
        assert_eq!(errors.for_field("email"), Some(FieldErrorKind::InvalidEmail));
        assert_eq!(errors.for_field("kind"), Some(FieldErrorKind::Required));
    }

    #[test]
    fn test_edit_keeps_last_login() {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("name", "Alice W.")
            .with("email", "alice@example.com")
            .with("kind", "student")
            .with("grade", "Grade 10");
        let draft = UserDraft::from_fields(&fields, &mut errors);
        let mut users = Collection::seeded(seed());
        let updated = users.update(&RecordId::from("s1"), draft).unwrap();
        assert_eq!(updated.name, "Alice W.");
        assert_eq!(updated.status, UserStatus::Active);
        assert!(updated.last_login.is_some());
    }
}
