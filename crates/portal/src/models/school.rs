//! Schools registered on the platform.

use schoolcom_core::{Email, RecordId, SchoolStatus};

use crate::records::{FormFields, Record, ValidationErrors};

/// Theme color used when none is chosen.
pub const DEFAULT_PRIMARY_COLOR: &str = "#CCCCCC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct School {
    pub id: RecordId,
    pub name: String,
    pub admin_email: Email,
    pub status: SchoolStatus,
    pub user_count: u32,
    pub primary_color: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub visible: bool,
}

impl School {
    /// Two-letter badge shown in place of a logo.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }

    pub const fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchoolDraft {
    pub name: String,
    pub admin_email: Option<Email>,
    /// Ignored on create; new schools always start pending.
    pub status: Option<SchoolStatus>,
    pub primary_color: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub visible: bool,
}

impl SchoolDraft {
    pub fn from_fields(fields: &FormFields, errors: &mut ValidationErrors) -> Self {
        Self {
            name: fields.text("name"),
            admin_email: fields.email("admin_email", errors),
            status: fields.choice("status", errors),
            primary_color: fields.color("primary_color", DEFAULT_PRIMARY_COLOR, errors),
            phone: fields.optional("phone"),
            address: fields.optional("address"),
            visible: fields.checkbox("visible"),
        }
    }
}

impl Record for School {
    type Draft = SchoolDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, self.admin_email.as_str()]
    }

    fn validate(draft: &SchoolDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &draft.name);
        errors.require_some("admin_email", draft.admin_email.as_ref());
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: SchoolDraft) -> Result<Self, ValidationErrors> {
        let admin_email = draft
            .admin_email
            .ok_or_else(|| ValidationErrors::required("admin_email"))?;
        Ok(Self {
            id,
            name: draft.name,
            admin_email,
            status: SchoolStatus::Pending,
            user_count: 0,
            primary_color: draft.primary_color,
            phone: draft.phone,
            address: draft.address,
            visible: draft.visible,
        })
    }

    fn apply(&mut self, draft: SchoolDraft) -> Result<(), ValidationErrors> {
        self.admin_email = draft
            .admin_email
            .ok_or_else(|| ValidationErrors::required("admin_email"))?;
        self.name = draft.name;
        if let Some(status) = draft.status {
            self.status = status;
        }
        self.primary_color = draft.primary_color;
        self.phone = draft.phone;
        self.address = draft.address;
        self.visible = draft.visible;
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn school(
    id: &str,
    name: &str,
    admin_email: &str,
    status: SchoolStatus,
    user_count: u32,
    primary_color: &str,
    phone: &str,
    address: &str,
) -> Option<School> {
    Some(School {
        id: RecordId::from(id),
        name: name.to_string(),
        admin_email: Email::parse(admin_email).ok()?,
        status,
        user_count,
        primary_color: primary_color.to_string(),
        phone: Some(phone.to_string()),
        address: Some(address.to_string()),
        visible: status != SchoolStatus::Inactive,
    })
}

#[must_use]
pub fn seed() -> Vec<School> {
    [
        school(
            "1",
            "Greenwood High",
            "admin@greenwood.com",
            SchoolStatus::Active,
            350,
            "#4CAF50",
            "+1 555 0101",
            "12 Elm Street, Springfield",
        ),
        school(
            "2",
            "Oakridge Academy",
            "principal@oakridge.edu",
            SchoolStatus::Active,
            520,
            "#2196F3",
            "+1 555 0102",
            "400 Oak Avenue, Riverton",
        ),
        school(
            "3",
            "Riverside Elementary",
            "info@riverside.org",
            SchoolStatus::Inactive,
            180,
            "#FF9800",
            "+1 555 0103",
            "8 River Road, Lakeside",
        ),
        school(
            "4",
            "North Star Kindergarten",
            "apply@northstar.kids",
            SchoolStatus::Pending,
            0,
            "#9C27B0",
            "+1 555 0104",
            "1 Polaris Way, Northfield",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::{Collection, FieldErrorKind, RecordError};

    fn draft(name: &str, email: &str) -> SchoolDraft {
        let mut errors = ValidationErrors::new();
        let fields = FormFields::new()
            .with("name", name)
            .with("admin_email", email)
            .with("primary_color", "#123abc");
        SchoolDraft::from_fields(&fields, &mut errors)
    }

    #[test]
    fn test_seed_is_complete() {
        assert_eq!(seed().len(), 4);
    }

    #[test]
    fn test_new_school_is_pending_with_no_users() {
        let mut schools = Collection::seeded(seed());
        let created = schools
            .create(draft("Hilltop Prep", "office@hilltop.edu"))
            .unwrap();
        assert_eq!(created.status, SchoolStatus::Pending);
        assert_eq!(created.user_count, 0);
        assert_eq!(created.primary_color, "#123ABC");
        assert_eq!(schools.all().last().unwrap().name, "Hilltop Prep");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = School::validate(&SchoolDraft::default()).unwrap_err();
        assert_eq!(err.for_field("name"), Some(FieldErrorKind::Required));
        assert_eq!(err.for_field("admin_email"), Some(FieldErrorKind::Required));
    }

    #[test]
    fn test_edit_keeps_user_count() {
        let mut schools = Collection::seeded(seed());
        let id = RecordId::from("2");
        let updated = schools
            .update(&id, draft("Oakridge Academy East", "east@oakridge.edu"))
            .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.user_count, 520);
        assert_eq!(updated.name, "Oakridge Academy East");
    }

    #[test]
    fn test_search_matches_admin_email() {
        let schools = Collection::seeded(seed());
        let hits = schools.search("NORTHSTAR");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().unwrap().initials(), "NO");
    }

    #[test]
    fn test_delete_unknown_school() {
        let mut schools = Collection::seeded(seed());
        assert!(matches!(
            schools.delete(&RecordId::from("99")),
            Err(RecordError::NotFound(_))
        ));
    }
}
