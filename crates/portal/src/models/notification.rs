//! Notifications composed by school admins and teachers, read by parents.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use schoolcom_core::{NotificationKind, NotificationStatus, RecordId, Role};

use crate::records::{FieldErrorKind, FormFields, Placement, Record, ValidationErrors};

/// One message in a notification thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub author: String,
    /// Written by the parent rather than the school.
    pub from_parent: bool,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    /// Course or audience the notification targets.
    pub recipients: String,
    pub status: NotificationStatus,
    pub kind: NotificationKind,
    pub sender: String,
    pub sender_role: Role,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
    pub child_name: Option<String>,
    pub replies: Vec<Reply>,
}

impl Notification {
    /// Returns `true` if the notification was unread.
    pub const fn mark_read(&mut self) -> bool {
        let was_unread = !self.read;
        self.read = true;
        was_unread
    }

    /// Append a parent reply. Blank text is ignored and returns `false`.
    pub fn add_reply(&mut self, author: &str, text: &str, now: DateTime<Utc>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.replies.push(Reply {
            author: author.to_owned(),
            from_parent: true,
            text: text.to_owned(),
            sent_at: now,
        });
        true
    }

    /// Whether the person signed in as `role` under `name` wrote this.
    #[must_use]
    pub fn is_written_by(&self, role: Role, name: &str) -> bool {
        self.sender_role == role && self.sender == name
    }
}

/// What the compose form was submitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeAction {
    #[default]
    Send,
    SaveDraft,
}

impl ComposeAction {
    const fn status(self) -> NotificationStatus {
        match self {
            Self::Send => NotificationStatus::Sent,
            Self::SaveDraft => NotificationStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationDraft {
    pub action: ComposeAction,
    pub title: String,
    pub content: String,
    pub kind: Option<NotificationKind>,
    pub recipients: Option<String>,
    pub sender: String,
    pub sender_role: Option<Role>,
}

impl NotificationDraft {
    /// Read the compose form. `targets` are the recipients the sender may pick.
    pub fn from_fields<'a>(
        action: ComposeAction,
        fields: &FormFields,
        targets: impl IntoIterator<Item = &'a str>,
        (sender, sender_role): (&str, Role),
        errors: &mut ValidationErrors,
    ) -> Self {
        let recipients = fields.optional("recipients");
        let known = |target: &str| targets.into_iter().any(|t| t == target);
        if recipients.as_deref().is_some_and(|target| !known(target)) {
            errors.add("recipients", FieldErrorKind::InvalidChoice);
        }

        Self {
            action,
            title: fields.text("title"),
            content: fields.text("content"),
            kind: fields.choice("kind", errors),
            recipients,
            sender: sender.to_owned(),
            sender_role: Some(sender_role),
        }
    }
}

impl Record for Notification {
    type Draft = NotificationDraft;

    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.content, &self.recipients]
    }

    /// Sending needs a title, content and target; a draft only a title.
    fn validate(draft: &NotificationDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &draft.title);
        if draft.action == ComposeAction::Send {
            errors.require("content", &draft.content);
            errors.require_some("recipients", draft.recipients.as_ref());
        }
        errors.require_some("sender_role", draft.sender_role.as_ref());
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: NotificationDraft) -> Result<Self, ValidationErrors> {
        let sender_role = draft
            .sender_role
            .ok_or_else(|| ValidationErrors::required("sender_role"))?;
        Ok(Self {
            id,
            title: draft.title,
            content: draft.content,
            recipients: draft.recipients.unwrap_or_default(),
            status: draft.action.status(),
            kind: draft.kind.unwrap_or(NotificationKind::GeneralUpdate),
            sender: draft.sender,
            sender_role,
            sent_at: Utc::now(),
            read: false,
            child_name: None,
            replies: Vec::new(),
        })
    }

    /// Rewrites an unsent notification; sending it stamps the send time.
    fn apply(&mut self, draft: NotificationDraft) -> Result<(), ValidationErrors> {
        self.title = draft.title;
        self.content = draft.content;
        if let Some(kind) = draft.kind {
            self.kind = kind;
        }
        self.recipients = draft.recipients.unwrap_or_default();
        self.status = draft.action.status();
        if self.status == NotificationStatus::Sent {
            self.sent_at = Utc::now();
        }
        Ok(())
    }

    fn delete_blocker(&self) -> Option<&'static str> {
        (!self.status.is_deletable()).then_some("notifications.errors.sentLocked")
    }
}

/// Notifications composed by `role`, newest first.
#[must_use]
pub fn history(items: &[Notification], role: Role) -> Vec<&Notification> {
    let mut sent: Vec<_> = items.iter().filter(|n| n.sender_role == role).collect();
    sent.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    sent
}

/// Sent notifications as a parent sees them, newest first.
#[must_use]
pub fn inbox(items: &[Notification]) -> Vec<&Notification> {
    let mut delivered: Vec<_> = items
        .iter()
        .filter(|n| n.status == NotificationStatus::Sent)
        .collect();
    delivered.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    delivered
}

#[must_use]
pub fn unread_count(items: &[Notification]) -> usize {
    inbox(items).iter().filter(|n| !n.read).count()
}

struct Seed<'a> {
    id: &'a str,
    title: &'a str,
    content: &'a str,
    recipients: &'a str,
    status: NotificationStatus,
    kind: NotificationKind,
    sender: &'a str,
    sender_role: Role,
    sent_at: Option<DateTime<Utc>>,
    read: bool,
    child_name: Option<&'a str>,
}

impl Seed<'_> {
    fn build(self) -> Option<Notification> {
        Some(Notification {
            id: RecordId::from(self.id),
            title: self.title.to_string(),
            content: self.content.to_string(),
            recipients: self.recipients.to_string(),
            status: self.status,
            kind: self.kind,
            sender: self.sender.to_string(),
            sender_role: self.sender_role,
            sent_at: self.sent_at?,
            read: self.read,
            child_name: self.child_name.map(str::to_string),
            replies: Vec::new(),
        })
    }
}

fn at(timestamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M")
        .ok()
        .map(|t| t.and_utc())
}

/// Outgoing history of both composer roles plus the parent inbox, with
/// the inbox items dated relative to `now`.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn seed(now: DateTime<Utc>) -> Vec<Notification> {
    use NotificationKind::{Announcement, Exam, GeneralUpdate, Homework, Reminder, Resource};
    use NotificationStatus::{Scheduled, Sent};

    let mut items: Vec<Notification> = [
        Seed {
            id: "1",
            title: "Welcome Back Assembly",
            content: "Join us for the welcome back assembly on Monday at 9 AM in the main hall.",
            recipients: "All School",
            status: Sent,
            kind: Announcement,
            sender: "School Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: at("2023-08-25 10:00"),
            read: true,
            child_name: None,
        },
        Seed {
            id: "2",
            title: "PTA Meeting Reminder",
            content: "The monthly PTA meeting will be held this Thursday at 6 PM in the library.",
            recipients: "All School",
            status: Sent,
            kind: Reminder,
            sender: "School Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: at("2023-08-28 14:30"),
            read: true,
            child_name: None,
        },
        Seed {
            id: "3",
            title: "School Holiday Notice",
            content: "School will be closed on September 4th for Labor Day.",
            recipients: "All School",
            status: Sent,
            kind: Announcement,
            sender: "School Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: at("2023-08-30 09:00"),
            read: true,
            child_name: None,
        },
        Seed {
            id: "tn1",
            title: "Homework Reminder: Algebra Ch. 3",
            content: "Please remember to complete exercises 1-15 in Chapter 3 by tomorrow.",
            recipients: "Algebra I",
            status: Sent,
            kind: Homework,
            sender: "Emily Davis",
            sender_role: Role::Teacher,
            sent_at: at("2023-09-15 14:00"),
            read: true,
            child_name: None,
        },
        Seed {
            id: "tn2",
            title: "Physics Lab Safety Rules",
            content: "Attached are the safety guidelines for upcoming lab sessions. Please review them carefully.",
            recipients: "Introduction to Physics",
            status: Sent,
            kind: Resource,
            sender: "Sarah Lee",
            sender_role: Role::Teacher,
            sent_at: at("2023-09-14 10:30"),
            read: true,
            child_name: None,
        },
        Seed {
            id: "tn3",
            title: "Upcoming Literature Quiz",
            content: "A short quiz on \"To Kill a Mockingbird\" chapters 1-5 will be held next Monday.",
            recipients: "English Literature",
            status: Scheduled,
            kind: Exam,
            sender: "Olivia Chen",
            sender_role: Role::Teacher,
            sent_at: at("2023-09-16 09:00"),
            read: false,
            child_name: None,
        },
        Seed {
            id: "p1",
            title: "School Picnic Day",
            content: "Annual school picnic is scheduled for next Friday. Please sign the permission slip.",
            recipients: "All School",
            status: Sent,
            kind: GeneralUpdate,
            sender: "Greenwood High Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: Some(now - Duration::days(3)),
            read: false,
            child_name: Some("Alex Johnson"),
        },
        Seed {
            id: "p2",
            title: "Math Homework Ch.5",
            content: "Complete exercises 1-10 from Chapter 5 by tomorrow.",
            recipients: "Algebra I",
            status: Sent,
            kind: Homework,
            sender: "Emily Davis",
            sender_role: Role::Teacher,
            sent_at: Some(now - Duration::days(1)),
            read: false,
            child_name: Some("Alex Johnson"),
        },
        Seed {
            id: "p3",
            title: "Science Fair Update",
            content: "Project submission deadline extended to next Monday.",
            recipients: "Introduction to Physics",
            status: Sent,
            kind: Announcement,
            sender: "Sarah Lee",
            sender_role: Role::Teacher,
            sent_at: Some(now - Duration::days(5)),
            read: true,
            child_name: Some("Alex Johnson"),
        },
        Seed {
            id: "p4",
            title: "Parent-Teacher Meeting",
            content: "Scheduled for Grade 2 on Oct 25th.",
            recipients: "Grade 2",
            status: Sent,
            kind: GeneralUpdate,
            sender: "Riverside Elementary Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: Some(now - Duration::days(2)),
            read: false,
            child_name: Some("Mia Williams"),
        },
        Seed {
            id: "p5",
            title: "Urgent: School Closure",
            content: "School closed tomorrow due to bad weather.",
            recipients: "All School",
            status: Sent,
            kind: Announcement,
            sender: "Greenwood High Admin",
            sender_role: Role::SchoolAdmin,
            sent_at: Some(now - Duration::hours(1)),
            read: false,
            child_name: Some("Alex Johnson"),
        },
    ]
    .into_iter()
    .filter_map(Seed::build)
    .collect();

    if let Some(homework) = items.iter_mut().find(|n| n.id.as_str() == "p2") {
        homework.replies.push(Reply {
            author: "Parent".to_string(),
            from_parent: true,
            text: "Thank you for the update, Ms. Davis.".to_string(),
            sent_at: now - Duration::hours(20),
        });
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::{Collection, RecordError};

    const TARGETS: [&str; 2] = ["All School", "Grade 1"];

    fn compose(action: ComposeAction, fields: &FormFields) -> (NotificationDraft, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let draft = NotificationDraft::from_fields(
            action,
            fields,
            TARGETS,
            ("School Admin", Role::SchoolAdmin),
            &mut errors,
        );
        (draft, errors)
    }

    #[test]
    fn test_seed_is_complete() {
        let items = seed(Utc::now());
        assert_eq!(items.len(), 11);
        assert_eq!(unread_count(&items), 4);
        let replies = &items.iter().find(|n| n.id.as_str() == "p2").unwrap().replies;
        assert_eq!(replies.len(), 1);
    }

    #[test]
    fn test_send_requires_content_and_target() {
        let (draft, errors) = compose(ComposeAction::Send, &FormFields::new().with("title", "Fire drill"));
        assert!(errors.is_empty());
        let err = Notification::validate(&draft).unwrap_err();
        assert_eq!(err.for_field("content"), Some(FieldErrorKind::Required));
        assert_eq!(err.for_field("recipients"), Some(FieldErrorKind::Required));
    }

    #[test]
    fn test_draft_needs_only_a_title() {
        let (draft, _) = compose(ComposeAction::SaveDraft, &FormFields::new().with("title", "Fire drill"));
        let mut items = Collection::seeded(seed(Utc::now()));
        let created = items.create(draft).unwrap();
        assert_eq!(created.status, NotificationStatus::Draft);
        assert_eq!(created.kind, NotificationKind::GeneralUpdate);
        let id = created.id.clone();
        assert_eq!(history(items.all(), Role::SchoolAdmin).first().unwrap().id, id);
        assert!(items.delete(&id).is_ok());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let fields = FormFields::new().with("title", "x").with("recipients", "Grade 12");
        let (_, errors) = compose(ComposeAction::Send, &fields);
        assert_eq!(errors.for_field("recipients"), Some(FieldErrorKind::InvalidChoice));
    }

    #[test]
    fn test_sent_notifications_cannot_be_deleted() {
        let mut items = Collection::seeded(seed(Utc::now()));
        assert!(matches!(
            items.delete(&RecordId::from("1")),
            Err(RecordError::Precondition("notifications.errors.sentLocked"))
        ));
        assert!(items.delete(&RecordId::from("tn3")).is_ok());
    }

    #[test]
    fn test_only_the_author_owns_a_notification() {
        let items = seed(Utc::now());
        let quiz = items.iter().find(|n| n.id.as_str() == "tn3").unwrap();
        assert!(quiz.is_written_by(Role::Teacher, "Olivia Chen"));
        assert!(!quiz.is_written_by(Role::Teacher, "Emily Davis"));
        assert!(!quiz.is_written_by(Role::SchoolAdmin, "Olivia Chen"));
    }

    #[test]
    fn test_history_is_newest_first_per_role() {
        let items = seed(Utc::now());
        let teacher: Vec<_> = history(&items, Role::Teacher)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(teacher, vec!["p2", "p3", "tn3", "tn1", "tn2"]);
    }

    #[test]
    fn test_inbox_hides_unsent_and_tracks_reads() {
        let mut items = seed(Utc::now());
        assert!(inbox(&items).iter().all(|n| n.status == NotificationStatus::Sent));
        assert_eq!(inbox(&items).first().unwrap().id.as_str(), "p5");

        let picnic = items.iter_mut().find(|n| n.id.as_str() == "p1").unwrap();
        assert!(picnic.mark_read());
        assert!(!picnic.mark_read());
        assert!(!picnic.add_reply("Parent", "   ", Utc::now()));
        assert!(picnic.add_reply("Parent", " Signed, thanks! ", Utc::now()));
        assert_eq!(picnic.replies.last().unwrap().text, "Signed, thanks!");
        assert_eq!(unread_count(&items), 3);
    }
}
