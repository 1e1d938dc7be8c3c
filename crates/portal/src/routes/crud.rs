//! Shared list + form pages for every record collection.
//!
//! A collection page is described once by a [`Resource`] and mounted with
//! [`router`], which provides:
//!
//! ```text
//! GET  {base}                 list (?q= search, ?kind= tab)
//! POST {base}                 create
//! GET  {base}/new             empty form
//! GET  {base}/{id}/edit       prefilled form
//! POST {base}/{id}            update
//! POST {base}/{id}/delete     delete
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use schoolcom_core::RecordId;
use serde::Deserialize;
use tracing::instrument;

use crate::auth::Session;
use crate::components::{
    CellView, FieldSpec, FormView, PageView, RowActionView, RowView, TabView, TableColumn,
    TableView,
};
use crate::error::AppError;
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{AllowedRoles, PageContext, RequireRole};
use crate::models::PortalData;
use crate::records::{Collection, FormFields, Record, RecordError, ValidationErrors};
use crate::state::AppState;

/// Query string of a list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub kind: Option<String>,
}

/// One record collection as a set of pages.
pub trait Resource: Send + Sync + 'static {
    type Item: Record;
    type Roles: AllowedRoles;

    /// Path the pages are mounted under.
    const BASE: &'static str;
    /// Translation key group (`{group}.title`, `{group}.new`, ...).
    const KEYS: &'static str;
    const COLUMNS: &'static [TableColumn];
    /// `(value, label key)` filter tabs, on the `kind` query parameter.
    const KIND_TABS: &'static [(&'static str, &'static str)] = &[];

    fn collection(data: &PortalData) -> &Collection<Self::Item>;

    fn collection_mut(data: &mut PortalData) -> &mut Collection<Self::Item>;

    /// Name used in flash messages.
    fn label(item: &Self::Item) -> String;

    fn cells(item: &Self::Item, t: &Translator) -> Vec<CellView>;

    fn fields(data: &PortalData) -> Vec<FieldSpec>;

    /// Form values that reproduce `item`.
    fn values(item: &Self::Item) -> FormFields;

    fn draft(
        fields: &FormFields,
        data: &PortalData,
        session: &Session,
        errors: &mut ValidationErrors,
    ) -> <Self::Item as Record>::Draft;

    fn row_actions(_item: &Self::Item, _t: &Translator) -> Vec<RowActionView> {
        Vec::new()
    }

    fn matches_kind(_item: &Self::Item, _kind: &str) -> bool {
        true
    }
}

/// Routes for one resource, to be nested at [`Resource::BASE`].
pub fn router<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/new", get(new_form::<R>))
        .route("/{id}", post(update::<R>))
        .route("/{id}/edit", get(edit_form::<R>))
        .route("/{id}/delete", post(delete::<R>))
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "records/list.html")]
pub struct RecordListTemplate {
    pub page: PageView,
    pub table: TableView,
    pub new_label: String,
    pub empty_label: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "records/form.html")]
pub struct RecordFormTemplate {
    pub page: PageView,
    pub form: FormView,
}

fn key<R: Resource>(suffix: &str) -> String {
    format!("{}.{suffix}", R::KEYS)
}

fn row<R: Resource>(item: &R::Item, t: &Translator) -> RowView {
    RowView {
        id: item.id().to_string(),
        cells: R::cells(item, t),
        actions: R::row_actions(item, t),
        delete_blocked: item.delete_blocker().map(|reason| t.t(reason)),
    }
}

fn tabs<R: Resource>(active: Option<&str>, t: &Translator) -> Vec<TabView> {
    if R::KIND_TABS.is_empty() {
        return Vec::new();
    }
    let all = TabView {
        href: R::BASE.to_owned(),
        label: t.t("common.all"),
        active: active.is_none(),
    };
    std::iter::once(all)
        .chain(R::KIND_TABS.iter().map(|(value, label_key)| TabView {
            href: format!("{}?kind={}", R::BASE, urlencode(value)),
            label: t.t(label_key),
            active: active == Some(*value),
        }))
        .collect()
}

/// Percent-encode a query value.
pub(super) fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// The list page for `query`.
#[must_use]
pub fn list_view<R: Resource>(page: &PageContext, data: &PortalData, query: &ListQuery) -> RecordListTemplate {
    let t = &page.translator;
    let kind = query.kind.as_deref().filter(|k| !k.is_empty());
    let rows = R::collection(data)
        .search(&query.q)
        .into_iter()
        .filter(|item| kind.is_none_or(|k| R::matches_kind(item, k)))
        .map(|item| row::<R>(item, t))
        .collect();

    RecordListTemplate {
        page: page.view(&key::<R>("title")),
        table: TableView {
            base: R::BASE,
            headers: R::COLUMNS.iter().map(|c| t.t(c.label_key)).collect(),
            rows,
            tabs: tabs::<R>(kind, t),
            query: query.q.trim().to_owned(),
            kind: kind.map(str::to_owned),
        },
        new_label: t.t(&key::<R>("new")),
        empty_label: t.t(&key::<R>("empty")),
    }
}

/// Render the form, with `422` when `errors` is not empty.
fn form_response<R: Resource>(
    page: &PageContext,
    data: &PortalData,
    id: Option<&RecordId>,
    values: &FormFields,
    errors: &ValidationErrors,
) -> Response {
    let t = &page.translator;
    let specs = R::fields(data);
    let heading = if id.is_some() { key::<R>("edit") } else { key::<R>("new") };
    let template = RecordFormTemplate {
        page: page.view(&heading),
        form: FormView {
            action: id.map_or_else(|| R::BASE.to_owned(), |id| format!("{}/{id}", R::BASE)),
            cancel_href: R::BASE,
            fields: FormView::build(&specs, values, errors, id.is_some(), t),
            submit_label: t.t("common.save"),
            general_errors: FormView::unplaced_errors(&specs, errors, t),
        },
    };

    if errors.is_empty() {
        template.into_response()
    } else {
        (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
    }
}

/// Build a draft, collecting both parse and validation errors.
fn checked_draft<R: Resource>(
    fields: &FormFields,
    data: &PortalData,
    session: &Session,
) -> Result<<R::Item as Record>::Draft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let draft = R::draft(fields, data, session, &mut errors);
    if let Err(more) = <R::Item as Record>::validate(&draft) {
        errors.merge(more);
    }
    errors.into_result().map(|()| draft)
}

// =============================================================================
// Handlers
// =============================================================================

#[instrument(skip_all, fields(base = R::BASE))]
pub async fn list<R: Resource>(
    RequireRole { page, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let data = state.data().await;
    list_view::<R>(&page, &data, &query).into_response()
}

#[instrument(skip_all, fields(base = R::BASE))]
pub async fn new_form<R: Resource>(
    RequireRole { page, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
) -> Response {
    let data = state.data().await;
    form_response::<R>(&page, &data, None, &FormFields::new(), &ValidationErrors::new())
}

#[instrument(skip_all, fields(base = R::BASE, id = %id))]
pub async fn edit_form<R: Resource>(
    RequireRole { page, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId::from(id);
    let data = state.data().await;
    if let Some(item) = R::collection(&data).get(&id) {
        return form_response::<R>(&page, &data, Some(&id), &R::values(item), &ValidationErrors::new());
    }
    drop(data);

    page.flash_error("records.notFound").await;
    Redirect::to(R::BASE).into_response()
}

#[instrument(skip_all, fields(base = R::BASE))]
pub async fn create<R: Resource>(
    RequireRole { page, session, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Result<Response, AppError> {
    let mut data = state.data_mut().await;
    let draft = match checked_draft::<R>(&fields, &data, &session) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_response::<R>(&page, &data, None, &fields, &errors)),
    };

    let outcome = R::collection_mut(&mut data).create(draft).map(|item| {
        tracing::info!(id = %item.id(), "record created");
        R::label(item)
    });
    let label = match outcome {
        Ok(label) => label,
        Err(RecordError::Validation(errors)) => {
            return Ok(form_response::<R>(&page, &data, None, &fields, &errors));
        }
        Err(e) => return Err(e.into()),
    };
    drop(data);

    page.flash_success("records.created", &[("name", &label)]).await;
    Ok(Redirect::to(R::BASE).into_response())
}

#[instrument(skip_all, fields(base = R::BASE, id = %id))]
pub async fn update<R: Resource>(
    RequireRole { page, session, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Response, AppError> {
    let id = RecordId::from(id);
    let mut data = state.data_mut().await;
    let draft = match checked_draft::<R>(&fields, &data, &session) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_response::<R>(&page, &data, Some(&id), &fields, &errors)),
    };

    let outcome = R::collection_mut(&mut data).update(&id, draft).map(R::label);
    let label = match outcome {
        Ok(label) => label,
        Err(RecordError::Validation(errors)) => {
            return Ok(form_response::<R>(&page, &data, Some(&id), &fields, &errors));
        }
        Err(RecordError::NotFound(_)) => {
            drop(data);
            page.flash_error("records.notFound").await;
            return Ok(Redirect::to(R::BASE).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    drop(data);

    tracing::info!("record updated");
    page.flash_success("records.updated", &[("name", &label)]).await;
    Ok(Redirect::to(R::BASE).into_response())
}

#[instrument(skip_all, fields(base = R::BASE, id = %id))]
pub async fn delete<R: Resource>(
    RequireRole { page, .. }: RequireRole<R::Roles>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId::from(id);
    let outcome = R::collection_mut(&mut *state.data_mut().await).delete(&id);

    match outcome {
        Ok(item) => {
            tracing::info!("record deleted");
            page.flash_success("records.deleted", &[("name", &R::label(&item))]).await;
        }
        Err(RecordError::Precondition(reason)) => {
            tracing::info!(reason, "delete refused");
            page.flash_error(reason).await;
        }
        Err(e) => {
            tracing::debug!(error = %e, "delete failed");
            page.flash_error("records.notFound").await;
        }
    }
    Redirect::to(R::BASE).into_response()
}
