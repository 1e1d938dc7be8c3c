//! Closed choice sets for record fields.
//!
//! Each choice has a wire name (what forms post and JSON carries) and a
//! translation key (`<group>.<wire>`) the portal renders through its catalog.

/// A value that is not one of the choices of the named set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ChoiceParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Define a choice enum with wire names and translation keys.
///
/// ```rust
/// # use schoolcom_core::define_choice;
/// define_choice! {
///     /// Weather at recess.
///     Weather, "weather" {
///         Sunny => "sunny",
///         Rainy => "rainy",
///     }
/// }
///
/// assert_eq!(Weather::Rainy.as_str(), "rainy");
/// assert_eq!(Weather::Sunny.label_key(), "weather.sunny");
/// assert_eq!("sunny".parse::<Weather>().ok(), Some(Weather::Sunny));
/// ```
#[macro_export]
macro_rules! define_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $group:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every choice, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name used in forms and JSON.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Translation key of the human label.
            #[must_use]
            pub const fn label_key(self) -> &'static str {
                match self {
                    $(Self::$variant => concat!($group, ".", $wire),)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::status::ChoiceParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err($crate::types::status::ChoiceParseError {
                        kind: $group,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

define_choice! {
    /// Onboarding state of a school on the platform.
    SchoolStatus, "schoolStatus" {
        Active => "active",
        Inactive => "inactive",
        /// Newly registered, awaiting activation.
        Pending => "pending",
    }
}

define_choice! {
    /// Kind of member managed by a school admin.
    UserKind, "userKind" {
        Student => "student",
        Teacher => "teacher",
        Staff => "staff",
    }
}

define_choice! {
    UserStatus, "userStatus" {
        Active => "active",
        /// Invited but never signed in.
        Invited => "invited",
        Inactive => "inactive",
    }
}

define_choice! {
    /// Delivery state of a notification.
    NotificationStatus, "notificationStatus" {
        Sent => "sent",
        Draft => "draft",
        Scheduled => "scheduled",
    }
}

define_choice! {
    /// What a notification is about. Also the event type handed to the AI helper.
    NotificationKind, "notificationKind" {
        Exam => "exam",
        Homework => "homework",
        Announcement => "announcement",
        Reminder => "reminder",
        Resource => "resource",
        GeneralUpdate => "general_update",
    }
}

define_choice! {
    /// Calendar event kinds. The first five are course-level (teacher),
    /// the rest institution-level (school admin); `meeting` and `reminder`
    /// serve both.
    EventKind, "eventKind" {
        Exam => "exam",
        Homework => "homework",
        Lesson => "lesson",
        Reminder => "reminder",
        Meeting => "meeting",
        Holiday => "holiday",
        SchoolEvent => "school_event",
        ExamPeriod => "exam_period",
    }
}

define_choice! {
    /// Category of a shared document.
    DocumentType, "documentType" {
        ClassMaterial => "class_material",
        EventPhotos => "event_photos",
        Agenda => "agenda",
        Newsletter => "newsletter",
        CateringMenu => "catering_menu",
        SchoolPolicy => "school_policy",
    }
}

impl EventKind {
    /// Kinds a teacher may put on a course calendar.
    pub const TEACHER: &'static [Self] = &[
        Self::Exam,
        Self::Homework,
        Self::Lesson,
        Self::Reminder,
        Self::Meeting,
    ];

    /// Kinds a school admin may put on the institution calendar.
    pub const SCHOOL: &'static [Self] = &[
        Self::Holiday,
        Self::SchoolEvent,
        Self::Meeting,
        Self::ExamPeriod,
        Self::Reminder,
    ];
}

impl NotificationStatus {
    /// Sent notifications are part of the record and cannot be removed.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        !matches!(self, Self::Sent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_parse_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), *kind);
        }
        for doc in DocumentType::ALL {
            assert_eq!(doc.as_str().parse::<DocumentType>().unwrap(), *doc);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&EventKind::SchoolEvent).unwrap();
        assert_eq!(json, "\"school_event\"");
        let parsed: NotificationKind = serde_json::from_str("\"general_update\"").unwrap();
        assert_eq!(parsed, NotificationKind::GeneralUpdate);
    }

    #[test]
    fn test_label_keys() {
        assert_eq!(SchoolStatus::Pending.label_key(), "schoolStatus.pending");
        assert_eq!(
            DocumentType::CateringMenu.label_key(),
            "documentType.catering_menu"
        );
    }

    #[test]
    fn test_parse_error_names_the_set() {
        let err = "archived".parse::<UserStatus>().unwrap_err();
        assert_eq!(err.kind, "userStatus");
        assert_eq!(err.to_string(), "invalid userStatus: archived");
    }

    #[test]
    fn test_only_sent_notifications_are_locked() {
        assert!(!NotificationStatus::Sent.is_deletable());
        assert!(NotificationStatus::Draft.is_deletable());
        assert!(NotificationStatus::Scheduled.is_deletable());
    }

    #[test]
    fn test_role_specific_event_kinds_are_subsets() {
        for kind in EventKind::TEACHER.iter().chain(EventKind::SCHOOL) {
            assert!(EventKind::ALL.contains(kind));
        }
    }
}
