//! Courses offered at a school.

use schoolcom_core::RecordId;

use crate::records::{FieldErrorKind, FormFields, Placement, Record, ValidationErrors};

use super::user::PortalUser;

/// Subjects a course can be filed under.
pub const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "Science",
    "English",
    "Social Studies",
    "Arts",
    "Physical Education",
    "Foreign Language",
    "Technology",
];

/// Subject filter tabs: stored subject and its label key.
pub const SUBJECT_TABS: [(&str, &str); 8] = [
    ("Mathematics", "subjects.mathematics"),
    ("Science", "subjects.science"),
    ("English", "subjects.english"),
    ("Social Studies", "subjects.socialStudies"),
    ("Arts", "subjects.arts"),
    ("Physical Education", "subjects.physicalEducation"),
    ("Foreign Language", "subjects.foreignLanguage"),
    ("Technology", "subjects.technology"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: RecordId,
    pub name: String,
    pub grade_level: String,
    pub subject: String,
    pub teacher_id: Option<RecordId>,
    pub teacher_name: Option<String>,
    pub description: Option<String>,
    pub student_count: u32,
}

/// A teacher picked for a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherAssignment {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub name: String,
    pub grade_level: String,
    pub subject: String,
    pub teacher: Option<TeacherAssignment>,
    pub description: Option<String>,
}

impl CourseDraft {
    /// Read a course form; `teacher_id` must name one of `teachers`.
    pub fn from_fields<'a>(
        fields: &FormFields,
        teachers: impl IntoIterator<Item = &'a PortalUser>,
        errors: &mut ValidationErrors,
    ) -> Self {
        let subject = fields.text("subject");
        if !subject.is_empty() && !SUBJECTS.contains(&subject.as_str()) {
            errors.add("subject", FieldErrorKind::InvalidChoice);
        }

        let teacher = fields.get("teacher_id").and_then(|wanted| {
            let found = teachers
                .into_iter()
                .find(|t| t.id.as_str() == wanted)
                .map(|t| TeacherAssignment {
                    id: t.id.clone(),
                    name: t.name.clone(),
                });
            if found.is_none() {
                errors.add("teacher_id", FieldErrorKind::InvalidChoice);
            }
            found
        });

        Self {
            name: fields.text("name"),
            grade_level: fields.text("grade_level"),
            subject,
            teacher,
            description: fields.optional("description"),
        }
    }
}

impl Record for Course {
    type Draft = CourseDraft;

    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.subject.as_str()];
        fields.extend(self.teacher_name.as_deref());
        fields.extend(self.description.as_deref());
        fields
    }

    fn validate(draft: &CourseDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &draft.name);
        errors.require("grade_level", &draft.grade_level);
        errors.require("subject", &draft.subject);
        errors.into_result()
    }

    fn from_draft(id: RecordId, draft: CourseDraft) -> Result<Self, ValidationErrors> {
        let (teacher_id, teacher_name) = split_teacher(draft.teacher);
        Ok(Self {
            id,
            name: draft.name,
            grade_level: draft.grade_level,
            subject: draft.subject,
            teacher_id,
            teacher_name,
            description: draft.description,
            student_count: 0,
        })
    }

    fn apply(&mut self, draft: CourseDraft) -> Result<(), ValidationErrors> {
        let (teacher_id, teacher_name) = split_teacher(draft.teacher);
        self.name = draft.name;
        self.grade_level = draft.grade_level;
        self.subject = draft.subject;
        self.teacher_id = teacher_id;
        self.teacher_name = teacher_name;
        self.description = draft.description;
        Ok(())
    }

    fn delete_blocker(&self) -> Option<&'static str> {
        (self.student_count > 0).then_some("courses.errors.hasStudents")
    }
}

fn split_teacher(teacher: Option<TeacherAssignment>) -> (Option<RecordId>, Option<String>) {
    teacher.map_or((None, None), |t| (Some(t.id), Some(t.name)))
}

fn course(
    id: &str,
    name: &str,
    grade_level: &str,
    subject: &str,
    teacher: (&str, &str),
    student_count: u32,
    description: &str,
) -> Course {
    Course {
        id: RecordId::from(id),
        name: name.to_string(),
        grade_level: grade_level.to_string(),
        subject: subject.to_string(),
        teacher_id: Some(RecordId::from(teacher.0)),
        teacher_name: Some(teacher.1.to_string()),
        description: Some(description.to_string()),
        student_count,
    }
}

#[must_use]
pub fn seed() -> Vec<Course> {
    vec![
        course(
            "c1",
            "Algebra I",
            "Grade 9",
            "Mathematics",
            ("t1", "Emily Davis"),
            28,
            "Fundamental algebraic concepts including linear equations, inequalities, functions, and polynomials.",
        ),
        course(
            "c2",
            "World History",
            "Grade 10",
            "Social Studies",
            ("t2", "John Carter"),
            25,
            "A survey of major historical events and civilizations from ancient times to the modern era.",
        ),
        course(
            "c3",
            "Introduction to Physics",
            "Grade 11",
            "Science",
            ("t3", "Sarah Lee"),
            22,
            "Basic principles of mechanics, heat, light, electricity, and magnetism.",
        ),
        course(
            "c4",
            "English Literature",
            "Grade 9",
            "English",
            ("t4", "Olivia Chen"),
            30,
            "Analysis of various literary genres, including novels, short stories, poetry, and drama.",
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::user;
    use crate::records::{Collection, RecordError};

    fn form(name: &str, teacher: &str) -> FormFields {
        FormFields::new()
            .with("name", name)
            .with("grade_level", "Grade 12")
            .with("subject", "Technology")
            .with("teacher_id", teacher)
    }

    #[test]
    fn test_new_course_is_prepended_with_no_students() {
        let users = user::seed();
        let mut errors = ValidationErrors::new();
        let draft = CourseDraft::from_fields(&form("Robotics", "t3"), &users, &mut errors);
        assert!(errors.is_empty());

        let mut courses = Collection::seeded(seed());
        let created = courses.create(draft).unwrap();
        assert_eq!(created.student_count, 0);
        assert_eq!(created.teacher_name.as_deref(), Some("Sarah Lee"));
        assert_eq!(courses.all().first().unwrap().name, "Robotics");
    }

    #[test]
    fn test_unknown_teacher_or_subject_is_rejected() {
        let users = user::seed();
        let mut errors = ValidationErrors::new();
        let fields = form("Robotics", "nobody").with("subject", "Alchemy");
        let draft = CourseDraft::from_fields(&fields, &users, &mut errors);
        assert!(draft.teacher.is_none());
        assert_eq!(errors.for_field("teacher_id"), Some(FieldErrorKind::InvalidChoice));
        assert_eq!(errors.for_field("subject"), Some(FieldErrorKind::InvalidChoice));
    }

    #[test]
    fn test_every_subject_has_a_tab() {
        let tabbed: Vec<&str> = SUBJECT_TABS.iter().map(|(value, _)| *value).collect();
        assert_eq!(tabbed, SUBJECTS);
    }

    #[test]
    fn test_search_covers_description() {
        let courses = Collection::seeded(seed());
        let found = courses.search("thermodynamics");
        assert!(found.is_empty());
        let found = courses.search("MAGNETISM");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Introduction to Physics");
    }

    #[test]
    fn test_course_with_students_cannot_be_deleted() {
        let mut courses = Collection::seeded(seed());
        assert!(matches!(
            courses.delete(&RecordId::from("c1")),
            Err(RecordError::Precondition("courses.errors.hasStudents"))
        ));
    }

    #[test]
    fn test_edit_keeps_student_count() {
        let users = user::seed();
        let mut errors = ValidationErrors::new();
        let draft = CourseDraft::from_fields(&form("Algebra II", "t1"), &users, &mut errors);
        let mut courses = Collection::seeded(seed());
        let updated = courses.update(&RecordId::from("c1"), draft).unwrap();
        assert_eq!(updated.student_count, 28);
        assert_eq!(updated.name, "Algebra II");
    }

    #[test]
    fn test_search_covers_teacher_name() {
        let courses = Collection::seeded(seed());
        let hits = courses.search("olivia");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().unwrap().id.as_str(), "c4");
    }
}
