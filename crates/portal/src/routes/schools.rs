//! School registry pages (system admin).

use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use schoolcom_core::{RecordId, SchoolStatus};
use tracing::instrument;

use super::crud::{self, Resource};
use crate::auth::Session;
use crate::components::{CellView, FieldKind, FieldSpec, RowActionView, TableColumn};
use crate::i18n::Translator;
use crate::middleware::{RequireRole, SystemAdminOnly};
use crate::models::{PortalData, School, SchoolDraft};
use crate::records::{Collection, FormFields, ValidationErrors};
use crate::state::AppState;

pub struct Schools;

impl Resource for Schools {
    type Item = School;
    type Roles = SystemAdminOnly;

    const BASE: &'static str = "/system-admin/schools";
    const KEYS: &'static str = "schools";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.name"),
        TableColumn::new("fields.admin_email"),
        TableColumn::new("fields.status"),
        TableColumn::new("fields.user_count"),
        TableColumn::new("fields.primary_color"),
        TableColumn::new("fields.visible"),
    ];

    fn collection(data: &PortalData) -> &Collection<School> {
        &data.schools
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<School> {
        &mut data.schools
    }

    fn label(item: &School) -> String {
        item.name.clone()
    }

    fn cells(item: &School, t: &Translator) -> Vec<CellView> {
        vec![
            CellView::text(&item.name),
            CellView::text(item.admin_email.as_str()),
            CellView::badge(t.t(item.status.label_key()), item.status.as_str()),
            CellView::text(item.user_count.to_string()),
            CellView::swatch(&item.primary_color),
            CellView::text(t.t(if item.visible { "common.yes" } else { "common.no" })),
        ]
    }

    fn fields(_data: &PortalData) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "fields.name", FieldKind::Text).required(),
            FieldSpec::new("admin_email", "fields.admin_email", FieldKind::Email).required(),
            FieldSpec::new(
                "status",
                "fields.status",
                FieldSpec::options_keyed(SchoolStatus::ALL, SchoolStatus::as_str, SchoolStatus::label_key),
            )
            .edit_only(),
            FieldSpec::new("primary_color", "fields.primary_color", FieldKind::Color),
            FieldSpec::new("phone", "fields.phone", FieldKind::Text),
            FieldSpec::new("address", "fields.address", FieldKind::Textarea),
            FieldSpec::new("visible", "fields.visible", FieldKind::Checkbox),
        ]
    }

    fn values(item: &School) -> FormFields {
        let mut fields = FormFields::new()
            .with("name", &item.name)
            .with("admin_email", item.admin_email.as_str())
            .with("status", item.status.as_str())
            .with("primary_color", &item.primary_color)
            .with("phone", item.phone.clone().unwrap_or_default())
            .with("address", item.address.clone().unwrap_or_default());
        if item.visible {
            fields.set("visible", "on");
        }
        fields
    }

    fn draft(
        fields: &FormFields,
        _data: &PortalData,
        _session: &Session,
        errors: &mut ValidationErrors,
    ) -> SchoolDraft {
        SchoolDraft::from_fields(fields, errors)
    }

    fn row_actions(item: &School, t: &Translator) -> Vec<RowActionView> {
        let label = if item.visible { "schools.hide" } else { "schools.show" };
        vec![RowActionView {
            action: "visibility",
            label: t.t(label),
        }]
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().nest(
        Schools::BASE,
        crud::router::<Schools>().route("/{id}/visibility", post(toggle_visibility)),
    )
}

/// Show or hide a school in the public directory.
#[instrument(skip_all, fields(id = %id))]
async fn toggle_visibility(
    RequireRole { page, .. }: RequireRole<SystemAdminOnly>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId::from(id);
    let toggled = state
        .data_mut()
        .await
        .schools
        .get_mut(&id)
        .map(|school| (school.name.clone(), school.toggle_visibility()));

    match toggled {
        Some((name, visible)) => {
            tracing::info!(visible, "school visibility changed");
            let key = if visible { "schools.nowVisible" } else { "schools.nowHidden" };
            page.flash_success(key, &[("name", &name)]).await;
        }
        None => page.flash_error("records.notFound").await,
    }
    Redirect::to(Schools::BASE).into_response()
}
