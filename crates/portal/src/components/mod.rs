//! Reusable view models shared by page templates.

pub mod record_view;
pub mod shell;

pub use record_view::{
    CellView, FieldKind, FieldSpec, FormFieldView, FormView, RowActionView, RowView, TableColumn,
    TableView, TabView,
};
pub use shell::{NavItemView, PageView, ShellView, initials, nav_for};
