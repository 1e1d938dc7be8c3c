//! Calendar pages: the school calendar, course calendars and the
//! read-only parent view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use schoolcom_core::EventKind;
use tracing::instrument;

use super::crud::{self, Resource};
use crate::auth::Session;
use crate::components::{CellView, FieldKind, FieldSpec, PageView, TableColumn};
use crate::filters;
use crate::i18n::Translator;
use crate::middleware::{ParentOnly, RequireRole, SchoolAdminOnly, TeacherOnly};
use crate::models::event::{ALL_STAFF, AUDIENCES};
use crate::models::{CalendarEvent, EventDraft, EventScope, PortalData};
use crate::records::{Collection, FormFields, ValidationErrors};
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn kind_field(scope: EventScope) -> FieldSpec {
    FieldSpec::new(
        "kind",
        "fields.event_kind",
        FieldSpec::options_keyed(scope.kinds(), EventKind::as_str, EventKind::label_key),
    )
    .required()
}

fn event_values(item: &CalendarEvent) -> FormFields {
    let mut fields = FormFields::new()
        .with("date", item.date.format(DATE_FORMAT).to_string())
        .with("title", &item.title)
        .with("description", &item.description)
        .with("kind", item.kind.as_str())
        .with("course_name", item.course_name.clone().unwrap_or_default())
        .with("audience", &item.audience);
    if item.institution_wide {
        fields.set("institution_wide", "on");
    }
    fields
}

fn event_cells(item: &CalendarEvent, t: &Translator) -> Vec<CellView> {
    vec![
        CellView::text(item.date.format(DATE_FORMAT).to_string()),
        CellView::text(&item.title),
        CellView::badge(t.t(item.kind.label_key()), item.kind.as_str()),
        CellView::text(item.course_name.as_deref().unwrap_or(&item.audience)),
    ]
}

pub struct SchoolCalendar;

impl Resource for SchoolCalendar {
    type Item = CalendarEvent;
    type Roles = SchoolAdminOnly;

    const BASE: &'static str = "/school-admin/calendar";
    const KEYS: &'static str = "calendar";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.date"),
        TableColumn::new("fields.title"),
        TableColumn::new("fields.event_kind"),
        TableColumn::new("fields.audience"),
    ];

    fn collection(data: &PortalData) -> &Collection<CalendarEvent> {
        &data.school_events
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<CalendarEvent> {
        &mut data.school_events
    }

    fn label(item: &CalendarEvent) -> String {
        item.title.clone()
    }

    fn cells(item: &CalendarEvent, t: &Translator) -> Vec<CellView> {
        event_cells(item, t)
    }

    fn fields(_data: &PortalData) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "fields.title", FieldKind::Text).required(),
            FieldSpec::new("date", "fields.date", FieldKind::Date).required(),
            kind_field(EventScope::School),
            FieldSpec::new("audience", "fields.audience", FieldSpec::options_from(AUDIENCES)),
            FieldSpec::new("description", "fields.description", FieldKind::Textarea),
            FieldSpec::new("institution_wide", "fields.institution_wide", FieldKind::Checkbox),
        ]
    }

    fn values(item: &CalendarEvent) -> FormFields {
        event_values(item)
    }

    fn draft(
        fields: &FormFields,
        _data: &PortalData,
        _session: &Session,
        errors: &mut ValidationErrors,
    ) -> EventDraft {
        EventDraft::from_fields(EventScope::School, fields, std::iter::empty(), errors)
    }
}

pub struct TeacherCalendar;

impl Resource for TeacherCalendar {
    type Item = CalendarEvent;
    type Roles = TeacherOnly;

    const BASE: &'static str = "/teacher/calendar";
    const KEYS: &'static str = "calendar";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.date"),
        TableColumn::new("fields.title"),
        TableColumn::new("fields.event_kind"),
        TableColumn::new("fields.course_name"),
    ];

    fn collection(data: &PortalData) -> &Collection<CalendarEvent> {
        &data.teacher_events
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<CalendarEvent> {
        &mut data.teacher_events
    }

    fn label(item: &CalendarEvent) -> String {
        item.title.clone()
    }

    fn cells(item: &CalendarEvent, t: &Translator) -> Vec<CellView> {
        event_cells(item, t)
    }

    fn fields(data: &PortalData) -> Vec<FieldSpec> {
        let courses = std::iter::once(ALL_STAFF).chain(data.course_names());
        vec![
            FieldSpec::new("title", "fields.title", FieldKind::Text).required(),
            FieldSpec::new("date", "fields.date", FieldKind::Date).required(),
            kind_field(EventScope::Teacher),
            FieldSpec::new("course_name", "fields.course_name", FieldSpec::options_from(courses))
                .required(),
            FieldSpec::new("description", "fields.description", FieldKind::Textarea),
        ]
    }

    fn values(item: &CalendarEvent) -> FormFields {
        event_values(item)
    }

    fn draft(
        fields: &FormFields,
        data: &PortalData,
        _session: &Session,
        errors: &mut ValidationErrors,
    ) -> EventDraft {
        EventDraft::from_fields(EventScope::Teacher, fields, data.course_names(), errors)
    }
}

// =============================================================================
// Parent view
// =============================================================================

/// One event on the parent calendar.
#[derive(Debug, Clone)]
pub struct EventView {
    pub date: String,
    pub title: String,
    pub description: String,
    pub kind: &'static str,
    pub kind_label: String,
    pub audience: String,
    pub upcoming: bool,
}

impl EventView {
    #[must_use]
    pub fn new(event: &CalendarEvent, today: NaiveDate, t: &Translator) -> Self {
        Self {
            date: event.date.format(DATE_FORMAT).to_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            kind: event.kind.as_str(),
            kind_label: t.t(event.kind.label_key()),
            audience: event
                .course_name
                .clone()
                .unwrap_or_else(|| event.audience.clone()),
            upcoming: event.is_upcoming(today),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "parent/calendar.html")]
pub struct ParentCalendarTemplate {
    pub page: PageView,
    pub upcoming: Vec<EventView>,
    pub past: Vec<EventView>,
}

/// School and course events, upcoming first.
#[instrument(skip_all)]
async fn parent_calendar(
    RequireRole { page, .. }: RequireRole<ParentOnly>,
    State(state): State<AppState>,
) -> Response {
    let today = chrono::Local::now().date_naive();
    let data = state.data().await;
    let (upcoming, mut past): (Vec<_>, Vec<_>) = data
        .all_events()
        .into_iter()
        .map(|e| EventView::new(e, today, &page.translator))
        .partition(|e| e.upcoming);
    past.reverse();

    ParentCalendarTemplate {
        page: page.view("calendar.title"),
        upcoming,
        past,
    }
    .into_response()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(SchoolCalendar::BASE, crud::router::<SchoolCalendar>())
        .nest(TeacherCalendar::BASE, crud::router::<TeacherCalendar>())
        .route("/parent/calendar", get(parent_calendar))
}
