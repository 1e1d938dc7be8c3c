//! Shared documents: teacher management and the parent library.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use schoolcom_core::DocumentType;
use serde::Deserialize;
use tracing::instrument;

use super::crud::{self, Resource, urlencode};
use crate::auth::Session;
use crate::components::{CellView, FieldKind, FieldSpec, PageView, TabView, TableColumn};
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{ParentOnly, RequireRole, TeacherOnly};
use crate::models::{DocumentDraft, PortalData, SharedDocument};
use crate::records::{Collection, FormFields, ValidationErrors};
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn visibility_label(item: &SharedDocument, t: &Translator) -> String {
    match (item.visible_to_parents, item.visible_to_teachers) {
        (true, true) => t.t("documents.visibility.everyone"),
        (true, false) => t.t("documents.visibility.parents"),
        (false, true) => t.t("documents.visibility.teachers"),
        (false, false) => t.t("documents.visibility.nobody"),
    }
}

pub struct TeacherDocuments;

impl Resource for TeacherDocuments {
    type Item = SharedDocument;
    type Roles = TeacherOnly;

    const BASE: &'static str = "/teacher/documents";
    const KEYS: &'static str = "documents";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.title"),
        TableColumn::new("fields.doc_type"),
        TableColumn::new("fields.file_name"),
        TableColumn::new("fields.visibility"),
        TableColumn::new("fields.uploaded_at"),
    ];

    fn collection(data: &PortalData) -> &Collection<SharedDocument> {
        &data.documents
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<SharedDocument> {
        &mut data.documents
    }

    fn label(item: &SharedDocument) -> String {
        item.title.clone()
    }

    fn cells(item: &SharedDocument, t: &Translator) -> Vec<CellView> {
        vec![
            CellView::text(&item.title),
            CellView::badge(t.t(item.doc_type.label_key()), item.doc_type.as_str()),
            CellView::text(&item.file_name),
            CellView::text(visibility_label(item, t)),
            CellView::text(item.uploaded_at.format(DATE_FORMAT).to_string()),
        ]
    }

    fn fields(_data: &PortalData) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "fields.title", FieldKind::Text).required(),
            FieldSpec::new(
                "doc_type",
                "fields.doc_type",
                FieldSpec::options_keyed(DocumentType::ALL, DocumentType::as_str, DocumentType::label_key),
            )
            .required(),
            FieldSpec::new("file_name", "fields.file_name", FieldKind::Text).required(),
            FieldSpec::new("description", "fields.description", FieldKind::Textarea),
            FieldSpec::new("visible_to_parents", "fields.visible_to_parents", FieldKind::Checkbox),
            FieldSpec::new("visible_to_teachers", "fields.visible_to_teachers", FieldKind::Checkbox),
        ]
    }

    fn values(item: &SharedDocument) -> FormFields {
        let mut fields = FormFields::new()
            .with("title", &item.title)
            .with("doc_type", item.doc_type.as_str())
            .with("file_name", &item.file_name)
            .with("description", &item.description);
        if item.visible_to_parents {
            fields.set("visible_to_parents", "on");
        }
        if item.visible_to_teachers {
            fields.set("visible_to_teachers", "on");
        }
        fields
    }

    fn draft(
        fields: &FormFields,
        _data: &PortalData,
        session: &Session,
        errors: &mut ValidationErrors,
    ) -> DocumentDraft {
        DocumentDraft::from_fields(fields, &session.display_name, errors)
    }
}

// =============================================================================
// Parent library
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentCard {
    pub title: String,
    pub description: String,
    pub type_label: String,
    pub file_name: String,
    pub icon: &'static str,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

impl DocumentCard {
    fn new(doc: &SharedDocument, t: &Translator) -> Self {
        Self {
            title: doc.title.clone(),
            description: doc.description.clone(),
            type_label: t.t(doc.doc_type.label_key()),
            file_name: doc.file_name.clone(),
            icon: doc.file_icon(),
            uploaded_by: doc.uploaded_by.clone(),
            uploaded_at: doc.uploaded_at.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "parent/documents.html")]
pub struct ParentDocumentsTemplate {
    pub page: PageView,
    pub documents: Vec<DocumentCard>,
    pub tabs: Vec<TabView>,
    pub query: String,
    pub doc_type: String,
}

/// Documents shared with parents, matching the search term and type.
#[must_use]
pub fn parent_library<'a>(
    data: &'a PortalData,
    term: &str,
    doc_type: Option<DocumentType>,
) -> Vec<&'a SharedDocument> {
    data.documents
        .search(term)
        .into_iter()
        .filter(|d| d.visible_to_parents)
        .filter(|d| doc_type.is_none_or(|wanted| d.doc_type == wanted))
        .collect()
}

#[instrument(skip_all)]
async fn parent_documents(
    RequireRole { page, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Response {
    let t = &page.translator;
    let doc_type = query.doc_type.as_deref().and_then(|v| v.parse::<DocumentType>().ok());
    let search = urlencode(query.q.trim());

    let all = TabView {
        href: format!("/parent/documents?q={search}"),
        label: t.t("common.all"),
        active: doc_type.is_none(),
    };
    let tabs = std::iter::once(all)
        .chain(DocumentType::ALL.iter().map(|&kind| TabView {
            href: format!("/parent/documents?q={search}&type={}", kind.as_str()),
            label: t.t(kind.label_key()),
            active: doc_type == Some(kind),
        }))
        .collect();

    let data = state.data().await;
    let documents = parent_library(&data, &query.q, doc_type)
        .into_iter()
        .map(|d| DocumentCard::new(d, t))
        .collect();

    ParentDocumentsTemplate {
        page: page.view("documents.title"),
        documents,
        tabs,
        query: query.q.trim().to_owned(),
        doc_type: doc_type.map(|d| d.as_str().to_owned()).unwrap_or_default(),
    }
    .into_response()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(TeacherDocuments::BASE, crud::router::<TeacherDocuments>())
        .route("/parent/documents", get(parent_documents))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn data() -> PortalData {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap_or_default();
        PortalData::seed_at(Utc::now(), today)
    }

    #[test]
    fn test_parent_library_hides_teacher_only_documents() {
        let mut data = data();
        let before = parent_library(&data, "", None).len();
        let draft = DocumentDraft {
            title: "Staff meeting agenda".to_string(),
            doc_type: Some(DocumentType::Agenda),
            visible_to_teachers: true,
            file_name: "agenda.pdf".to_string(),
            ..DocumentDraft::default()
        };
        assert!(data.documents.create(draft).is_ok());

        assert_eq!(parent_library(&data, "", None).len(), before);
        assert!(parent_library(&data, "agenda", None).is_empty());
    }

    #[test]
    fn test_parent_library_filters_by_type() {
        let data = data();
        for kind in DocumentType::ALL {
            assert!(
                parent_library(&data, "", Some(*kind))
                    .iter()
                    .all(|d| d.doc_type == *kind)
            );
        }
    }

    #[test]
    fn test_urlencode() {
        assert_eq!(urlencode("field trip"), "field+trip");
    }
}
