//! View models for the shared record list and record form templates.
//!
//! CRUD pages describe their columns and fields with these types; the
//! `records/list.html` and `records/form.html` templates render them.

use crate::i18n::Translator;
use crate::records::{FormFields, ValidationErrors};

/// Column definition for a record table.
#[derive(Debug, Clone, Copy)]
pub struct TableColumn {
    pub label_key: &'static str,
}

impl TableColumn {
    #[must_use]
    pub const fn new(label_key: &'static str) -> Self {
        Self { label_key }
    }
}

/// One rendered cell.
#[derive(Debug, Clone, Default)]
pub struct CellView {
    pub text: String,
    /// CSS modifier for a status badge, e.g. `active`.
    pub badge: Option<String>,
    /// Color swatch shown before the text.
    pub swatch: Option<String>,
}

impl CellView {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Optional text, rendered as a dash when absent.
    #[must_use]
    pub fn optional(text: Option<&str>) -> Self {
        Self::text(text.unwrap_or("-"))
    }

    #[must_use]
    pub fn badge(text: impl Into<String>, modifier: &str) -> Self {
        Self {
            text: text.into(),
            badge: Some(modifier.to_owned()),
            swatch: None,
        }
    }

    #[must_use]
    pub fn swatch(color: &str) -> Self {
        Self {
            text: color.to_owned(),
            badge: None,
            swatch: Some(color.to_owned()),
        }
    }
}

/// An extra per-row button posting to `{base}/{id}/{action}`.
#[derive(Debug, Clone)]
pub struct RowActionView {
    pub action: &'static str,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<CellView>,
    pub actions: Vec<RowActionView>,
    /// Translated reason the delete button is disabled.
    pub delete_blocked: Option<String>,
}

/// A filter tab above the table (`?{param}={value}`).
#[derive(Debug, Clone)]
pub struct TabView {
    pub href: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct TableView {
    pub base: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub tabs: Vec<TabView>,
    pub query: String,
    /// Active kind tab, kept when searching.
    pub kind: Option<String>,
}

/// How a form field is rendered.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Date,
    Color,
    /// `(value, label key)` pairs.
    Select(Vec<(String, &'static str)>),
    /// `(value, label)` pairs shown without translation.
    PlainSelect(Vec<(String, String)>),
    Checkbox,
}

/// Field definition for a record form.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label_key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Only shown when editing.
    pub edit_only: bool,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, label_key: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label_key,
            kind,
            required: false,
            edit_only: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn edit_only(mut self) -> Self {
        self.edit_only = true;
        self
    }

    /// Select options from a list of plain labels used as their own values.
    #[must_use]
    pub fn options_from<'a>(labels: impl IntoIterator<Item = &'a str>) -> FieldKind {
        FieldKind::PlainSelect(
            labels
                .into_iter()
                .map(|l| (l.to_owned(), l.to_owned()))
                .collect(),
        )
    }

    /// Select options from wire names and label keys of a choice set.
    #[must_use]
    pub fn options_keyed<T: Copy>(
        choices: &[T],
        wire: impl Fn(T) -> &'static str,
        label: impl Fn(T) -> &'static str,
    ) -> FieldKind {
        FieldKind::Select(
            choices
                .iter()
                .map(|&c| (wire(c).to_owned(), label(c)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: String,
    /// `text`, `email`, `date`, `color`, `textarea`, `select` or `checkbox`.
    pub input_type: &'static str,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub options: Vec<OptionView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FormView {
    pub action: String,
    pub cancel_href: &'static str,
    pub fields: Vec<FormFieldView>,
    pub submit_label: String,
    /// Errors on fields the form does not show (e.g. `visibility`).
    pub general_errors: Vec<String>,
}

impl FormView {
    /// Render `specs` with `values`, attaching a message to each field in
    /// `errors`.
    #[must_use]
    pub fn build(
        specs: &[FieldSpec],
        values: &FormFields,
        errors: &ValidationErrors,
        editing: bool,
        t: &Translator,
    ) -> Vec<FormFieldView> {
        specs
            .iter()
            .filter(|spec| editing || !spec.edit_only)
            .map(|spec| {
                let label = t.t(spec.label_key);
                let value = values.text(spec.name);
                let (input_type, options) = match &spec.kind {
                    FieldKind::Text => ("text", Vec::new()),
                    FieldKind::Textarea => ("textarea", Vec::new()),
                    FieldKind::Email => ("email", Vec::new()),
                    FieldKind::Date => ("date", Vec::new()),
                    FieldKind::Color => ("color", Vec::new()),
                    FieldKind::Checkbox => ("checkbox", Vec::new()),
                    FieldKind::Select(choices) => (
                        "select",
                        choices
                            .iter()
                            .map(|(v, key)| OptionView {
                                value: v.clone(),
                                label: t.t(key),
                                selected: *v == value,
                            })
                            .collect(),
                    ),
                    FieldKind::PlainSelect(choices) => (
                        "select",
                        choices
                            .iter()
                            .map(|(v, label)| OptionView {
                                value: v.clone(),
                                label: label.clone(),
                                selected: *v == value,
                            })
                            .collect(),
                    ),
                };
                FormFieldView {
                    name: spec.name,
                    input_type,
                    checked: values.checkbox(spec.name),
                    required: spec.required,
                    options,
                    error: errors
                        .for_field(spec.name)
                        .map(|kind| t.t_with(kind.message_key(), &[("field", &label)])),
                    label,
                    value,
                }
            })
            .collect()
    }

    /// Messages for errors on fields not in `specs`.
    #[must_use]
    pub fn unplaced_errors(specs: &[FieldSpec], errors: &ValidationErrors, t: &Translator) -> Vec<String> {
        errors
            .iter()
            .filter(|e| !specs.iter().any(|s| s.name == e.field))
            .map(|e| {
                let label = t.t(&format!("fields.{}", e.field));
                t.t_with(e.kind.message_key(), &[("field", &label)])
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use schoolcom_core::{Language, SchoolStatus};

    use super::*;
    use crate::i18n::Catalog;
    use crate::records::FieldErrorKind;

    fn translator() -> Translator {
        Translator::new(Arc::new(Catalog::embedded().unwrap()), Language::En)
    }

    fn specs() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "fields.name", FieldKind::Text).required(),
            FieldSpec::new(
                "status",
                "fields.status",
                FieldSpec::options_keyed(SchoolStatus::ALL, SchoolStatus::as_str, SchoolStatus::label_key),
            )
            .edit_only(),
            FieldSpec::new("visible", "fields.visible", FieldKind::Checkbox),
        ]
    }

    #[test]
    fn test_edit_only_fields_are_hidden_on_create() {
        let fields = FormView::build(&specs(), &FormFields::new(), &ValidationErrors::new(), false, &translator());
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "visible"]);
    }

    #[test]
    fn test_values_selection_and_errors() {
        let values = FormFields::new().with("status", "pending").with("visible", "on");
        let errors = ValidationErrors::required("name");
        let fields = FormView::build(&specs(), &values, &errors, true, &translator());

        let name = fields.first().unwrap();
        assert_eq!(name.error.as_deref(), Some("Name is required."));

        let status = fields.get(1).unwrap();
        assert_eq!(status.input_type, "select");
        let selected: Vec<_> = status.options.iter().filter(|o| o.selected).map(|o| o.label.as_str()).collect();
        assert_eq!(selected, vec!["Pending"]);

        assert!(fields.get(2).unwrap().checked);
    }

    #[test]
    fn test_unplaced_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("visibility", FieldErrorKind::Required);
        errors.add("name", FieldErrorKind::Required);
        let messages = FormView::unplaced_errors(&specs(), &errors, &translator());
        assert_eq!(messages, vec!["Visibility is required.".to_string()]);
    }

    #[test]
    fn test_cells() {
        assert_eq!(CellView::optional(None).text, "-");
        assert_eq!(CellView::swatch("#4CAF50").swatch.as_deref(), Some("#4CAF50"));
        assert_eq!(CellView::badge("Active", "active").badge.as_deref(), Some("active"));
    }
}
