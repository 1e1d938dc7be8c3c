//! Documents and galleries shared with parents and colleagues.

use chrono::{DateTime, Duration, Utc};
use schoolcom_core::{DocumentType, RecordId};

use crate::records::{FieldErrorKind, FormFields, Placement, Record, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedDocument {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub doc_type: DocumentType,
    pub visible_to_parents: bool,
    pub visible_to_teachers: bool,
    pub file_name: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

impl SharedDocument {
    /// Short icon name derived from the file extension.
    #[must_use]
    pub fn file_icon(&self) -> &'static str {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => "pdf",
            "png" | "jpg" | "jpeg" | "gif" | "webp" => "image",
            "zip" => "zip",
            "mp4" | "mov" => "video",
            _ => "file",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentDraft {
    pub title: String,
    pub description: String,
    pub doc_type: Option<DocumentType>,
    pub visible_to_parents: bool,
    pub visible_to_teachers: bool,
    pub file_name: String,
    /// Display name of the uploader; only used on create.
    pub uploaded_by: String,
}

impl DocumentDraft {
    pub fn from_fields(fields: &FormFields, uploaded_by: &str, errors: &mut ValidationErrors) -> Self {
        Self {
            title: fields.text("title"),
            description: fields.text("description"),
            doc_type: fields.choice("doc_type", errors),
            visible_to_parents: fields.checkbox("visible_to_parents"),
            visible_to_teachers: fields.checkbox("visible_to_teachers"),
            file_name: fields.text("file_name"),
            uploaded_by: uploaded_by.to_owned(),
        }
    }
}

impl Record for SharedDocument {
    type Draft = DocumentDraft;

    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn validate(draft: &DocumentDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &draft.title);
        errors.require("file_name", &draft.file_name);
        errors.require_some("doc_type", draft.doc_type.as_ref());
        if !draft.visible_to_parents && !draft.visible_to_teachers {
            errors.add("visibility", FieldErrorKind::Required);
        }
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: DocumentDraft) -> Result<Self, ValidationErrors> {
        let doc_type = draft
            .doc_type
            .ok_or_else(|| ValidationErrors::required("doc_type"))?;
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            doc_type,
            visible_to_parents: draft.visible_to_parents,
            visible_to_teachers: draft.visible_to_teachers,
            file_name: draft.file_name,
            uploaded_by: draft.uploaded_by,
            uploaded_at: Utc::now(),
        })
    }

    fn apply(&mut self, draft: DocumentDraft) -> Result<(), ValidationErrors> {
        self.doc_type = draft
            .doc_type
            .ok_or_else(|| ValidationErrors::required("doc_type"))?;
        self.title = draft.title;
        self.description = draft.description;
        self.visible_to_parents = draft.visible_to_parents;
        self.visible_to_teachers = draft.visible_to_teachers;
        self.file_name = draft.file_name;
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn document(
    id: &str,
    title: &str,
    description: &str,
    doc_type: DocumentType,
    (parents, teachers): (bool, bool),
    file_name: &str,
    uploaded_by: &str,
    uploaded_at: DateTime<Utc>,
) -> SharedDocument {
    SharedDocument {
        id: RecordId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        doc_type,
        visible_to_parents: parents,
        visible_to_teachers: teachers,
        file_name: file_name.to_string(),
        uploaded_by: uploaded_by.to_string(),
        uploaded_at,
    }
}

/// Shared documents, dated relative to `now`.
#[must_use]
pub fn seed(now: DateTime<Utc>) -> Vec<SharedDocument> {
    vec![
        document(
            "doc1",
            "October Lunch Menu",
            "The official lunch menu for the month of October.",
            DocumentType::CateringMenu,
            (true, true),
            "oct_menu.pdf",
            "Admin",
            now - Duration::days(2),
        ),
        document(
            "doc2",
            "School Fair Photos",
            "A collection of photos from our successful school fair.",
            DocumentType::EventPhotos,
            (true, true),
            "fair_photos.zip",
            "Emily Davis",
            now - Duration::days(5),
        ),
        document(
            "doc3",
            "Updated Health Policy",
            "Please review the updated health and safety policy for this year.",
            DocumentType::SchoolPolicy,
            (true, true),
            "health_policy_2024.pdf",
            "Admin",
            now - Duration::days(7),
        ),
        document(
            "doc4",
            "Weekly Newsletter - Oct 1st",
            "This week's updates and announcements.",
            DocumentType::Newsletter,
            (true, true),
            "newsletter_oct1.pdf",
            "Admin",
            now - Duration::days(6),
        ),
        document(
            "doc5",
            "Maths Worksheet Ch.5",
            "Optional practice worksheet for algebra chapter 5.",
            DocumentType::ClassMaterial,
            (true, false),
            "math_worksheet.pdf",
            "Emily Davis",
            now - Duration::days(3),
        ),
    ]
}
