//! Student, teacher and staff accounts (school admin).

use axum::Router;
use schoolcom_core::{UserKind, UserStatus};

use super::crud::{self, Resource};
use crate::auth::Session;
use crate::components::{CellView, FieldKind, FieldSpec, TableColumn};
use crate::i18n::Translator;
use crate::middleware::SchoolAdminOnly;
use crate::models::{PortalData, PortalUser, UserDraft};
use crate::records::{Collection, FormFields, ValidationErrors};
use crate::state::AppState;

pub struct Users;

impl Resource for Users {
    type Item = PortalUser;
    type Roles = SchoolAdminOnly;

    const BASE: &'static str = "/school-admin/users";
    const KEYS: &'static str = "users";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.name"),
        TableColumn::new("fields.email"),
        TableColumn::new("fields.kind"),
        TableColumn::new("fields.detail"),
        TableColumn::new("fields.status"),
        TableColumn::new("fields.last_login"),
    ];
    const KIND_TABS: &'static [(&'static str, &'static str)] = &[
        ("student", "users.tabs.students"),
        ("teacher", "users.tabs.teachers"),
        ("staff", "users.tabs.staff"),
    ];

    fn collection(data: &PortalData) -> &Collection<PortalUser> {
        &data.users
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<PortalUser> {
        &mut data.users
    }

    fn label(item: &PortalUser) -> String {
        item.name.clone()
    }

    fn cells(item: &PortalUser, t: &Translator) -> Vec<CellView> {
        let last_login = item.last_login.map(|d| d.format("%Y-%m-%d").to_string());
        vec![
            CellView::text(&item.name),
            CellView::text(item.email.as_str()),
            CellView::text(t.t(item.kind.label_key())),
            CellView::optional(item.detail()),
            CellView::badge(t.t(item.status.label_key()), item.status.as_str()),
            CellView::optional(last_login.as_deref()),
        ]
    }

    fn fields(_data: &PortalData) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "fields.name", FieldKind::Text).required(),
            FieldSpec::new("email", "fields.email", FieldKind::Email).required(),
            FieldSpec::new(
                "kind",
                "fields.kind",
                FieldSpec::options_keyed(UserKind::ALL, UserKind::as_str, UserKind::label_key),
            )
            .required(),
            FieldSpec::new(
                "status",
                "fields.status",
                FieldSpec::options_keyed(UserStatus::ALL, UserStatus::as_str, UserStatus::label_key),
            ),
            FieldSpec::new("grade", "fields.grade", FieldKind::Text),
            FieldSpec::new("subject", "fields.subject", FieldKind::Text),
            FieldSpec::new("department", "fields.department", FieldKind::Text),
        ]
    }

    fn values(item: &PortalUser) -> FormFields {
        FormFields::new()
            .with("name", &item.name)
            .with("email", item.email.as_str())
            .with("kind", item.kind.as_str())
            .with("status", item.status.as_str())
            .with("grade", item.grade.clone().unwrap_or_default())
            .with("subject", item.subject.clone().unwrap_or_default())
            .with("department", item.department.clone().unwrap_or_default())
    }

    fn draft(
        fields: &FormFields,
        _data: &PortalData,
        _session: &Session,
        errors: &mut ValidationErrors,
    ) -> UserDraft {
        UserDraft::from_fields(fields, errors)
    }

    fn matches_kind(item: &PortalUser, kind: &str) -> bool {
        item.kind.as_str() == kind
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().nest(Users::BASE, crud::router::<Users>())
}
