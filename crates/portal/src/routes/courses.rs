//! Course management (school admin) and the teacher's course list.

use axum::Router;

use super::crud::{self, Resource};
use crate::auth::Session;
use crate::components::{CellView, FieldKind, FieldSpec, TableColumn};
use crate::i18n::Translator;
use crate::middleware::{SchoolAdminOnly, TeacherOnly};
use crate::models::course::{SUBJECT_TABS, SUBJECTS};
use crate::models::{Course, CourseDraft, PortalData};
use crate::records::{Collection, FormFields, ValidationErrors};
use crate::state::AppState;

pub struct Courses;

impl Resource for Courses {
    type Item = Course;
    type Roles = SchoolAdminOnly;

    const BASE: &'static str = "/school-admin/courses";
    const KEYS: &'static str = "courses";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.name"),
        TableColumn::new("fields.grade_level"),
        TableColumn::new("fields.subject"),
        TableColumn::new("fields.teacher_id"),
        TableColumn::new("fields.student_count"),
    ];

    fn collection(data: &PortalData) -> &Collection<Course> {
        &data.courses
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<Course> {
        &mut data.courses
    }

    fn label(item: &Course) -> String {
        item.name.clone()
    }

    fn cells(item: &Course, _t: &Translator) -> Vec<CellView> {
        vec![
            CellView::text(&item.name),
            CellView::text(&item.grade_level),
            CellView::text(&item.subject),
            CellView::optional(item.teacher_name.as_deref()),
            CellView::text(item.student_count.to_string()),
        ]
    }

    fn fields(data: &PortalData) -> Vec<FieldSpec> {
        let teachers = data
            .teachers()
            .map(|t| (t.id.to_string(), t.name.clone()))
            .collect();
        vec![
            FieldSpec::new("name", "fields.name", FieldKind::Text).required(),
            FieldSpec::new("grade_level", "fields.grade_level", FieldKind::Text).required(),
            FieldSpec::new("subject", "fields.subject", FieldSpec::options_from(SUBJECTS)).required(),
            FieldSpec::new("teacher_id", "fields.teacher_id", FieldKind::PlainSelect(teachers)),
            FieldSpec::new("description", "fields.description", FieldKind::Textarea),
        ]
    }

    fn values(item: &Course) -> FormFields {
        FormFields::new()
            .with("name", &item.name)
            .with("grade_level", &item.grade_level)
            .with("subject", &item.subject)
            .with(
                "teacher_id",
                item.teacher_id.as_ref().map(ToString::to_string).unwrap_or_default(),
            )
            .with("description", item.description.clone().unwrap_or_default())
    }

    fn draft(
        fields: &FormFields,
        data: &PortalData,
        _session: &Session,
        errors: &mut ValidationErrors,
    ) -> CourseDraft {
        CourseDraft::from_fields(fields, data.teachers(), errors)
    }
}

/// A teacher's view of the course catalogue with subject tabs. Forms are
/// the same as the school admin's.
pub struct TeacherCourses;

impl Resource for TeacherCourses {
    type Item = Course;
    type Roles = TeacherOnly;

    const BASE: &'static str = "/teacher/courses";
    const KEYS: &'static str = "teacherCourses";
    const COLUMNS: &'static [TableColumn] = &[
        TableColumn::new("fields.name"),
        TableColumn::new("fields.grade_level"),
        TableColumn::new("fields.subject"),
        TableColumn::new("fields.description"),
        TableColumn::new("fields.student_count"),
    ];
    const KIND_TABS: &'static [(&'static str, &'static str)] = &SUBJECT_TABS;

    fn collection(data: &PortalData) -> &Collection<Course> {
        &data.courses
    }

    fn collection_mut(data: &mut PortalData) -> &mut Collection<Course> {
        &mut data.courses
    }

    fn label(item: &Course) -> String {
        item.name.clone()
    }

    fn cells(item: &Course, _t: &Translator) -> Vec<CellView> {
        vec![
            CellView::text(&item.name),
            CellView::text(&item.grade_level),
            CellView::text(&item.subject),
            CellView::optional(item.description.as_deref()),
            CellView::text(item.student_count.to_string()),
        ]
    }

    fn fields(data: &PortalData) -> Vec<FieldSpec> {
        Courses::fields(data)
    }

    fn values(item: &Course) -> FormFields {
        Courses::values(item)
    }

    fn draft(
        fields: &FormFields,
        data: &PortalData,
        session: &Session,
        errors: &mut ValidationErrors,
    ) -> CourseDraft {
        Courses::draft(fields, data, session, errors)
    }

    fn matches_kind(item: &Course, kind: &str) -> bool {
        item.subject == kind
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(Courses::BASE, crud::router::<Courses>())
        .nest(TeacherCourses::BASE, crud::router::<TeacherCourses>())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use schoolcom_core::RecordId;

    use super::*;
    use crate::models::course;

    #[test]
    fn test_subject_tabs_match_stored_subject() {
        let courses = course::seed();
        let history = courses.iter().find(|c| c.id == RecordId::from("c2")).unwrap();
        assert!(TeacherCourses::matches_kind(history, "Social Studies"));
        assert!(!TeacherCourses::matches_kind(history, "Science"));
        assert!(TeacherCourses::KIND_TABS.iter().any(|(value, _)| *value == history.subject));
    }

    #[test]
    fn test_teacher_form_matches_admin_form() {
        let data = PortalData::seed();
        let names = |fields: Vec<FieldSpec>| fields.into_iter().map(|f| f.name).collect::<Vec<_>>();
        assert_eq!(names(TeacherCourses::fields(&data)), names(Courses::fields(&data)));
    }
}
