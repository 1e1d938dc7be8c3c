//! Dashboard frame: sidebar navigation, header and footer.
//!
//! Every signed-in page renders inside the same shell. What differs per
//! role is the sidebar.

use schoolcom_core::Role;

use crate::auth::Session;
use crate::i18n::Translator;
use crate::middleware::flash::Flash;

/// A sidebar entry before translation.
#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub href: &'static str,
    pub label_key: &'static str,
    pub icon: &'static str,
}

const fn item(href: &'static str, label_key: &'static str, icon: &'static str) -> NavItem {
    NavItem {
        href,
        label_key,
        icon,
    }
}

const SYSTEM_ADMIN_NAV: &[NavItem] = &[
    item("/system-admin", "nav.dashboard", "dashboard"),
    item("/system-admin/schools", "nav.schools", "school"),
    item("/system-admin/stats", "nav.stats", "chart"),
];

const SCHOOL_ADMIN_NAV: &[NavItem] = &[
    item("/school-admin", "nav.dashboard", "dashboard"),
    item("/school-admin/courses", "nav.courses", "book"),
    item("/school-admin/users", "nav.users", "users"),
    item("/school-admin/notifications", "nav.notifications", "bell"),
    item("/school-admin/calendar", "nav.calendar", "calendar"),
];

const TEACHER_NAV: &[NavItem] = &[
    item("/teacher", "nav.dashboard", "dashboard"),
    item("/teacher/courses", "nav.courses", "book"),
    item("/teacher/notifications", "nav.notifications", "bell"),
    item("/teacher/calendar", "nav.calendar", "calendar"),
    item("/teacher/documents", "nav.documents", "folder"),
    item("/teacher/profile", "nav.profile", "user"),
];

const PARENT_NAV: &[NavItem] = &[
    item("/parent", "nav.home", "home"),
    item("/parent/notifications", "nav.notifications", "bell"),
    item("/parent/calendar", "nav.calendar", "calendar"),
    item("/parent/documents", "nav.documents", "folder"),
    item("/parent/profile", "nav.profile", "user"),
];

/// Sidebar entries for a role, in display order.
#[must_use]
pub const fn nav_for(role: Role) -> &'static [NavItem] {
    match role {
        Role::SystemAdmin => SYSTEM_ADMIN_NAV,
        Role::SchoolAdmin => SCHOOL_ADMIN_NAV,
        Role::Teacher => TEACHER_NAV,
        Role::Parent => PARENT_NAV,
    }
}

/// Whether `href` is the sidebar entry for `path`. Landing pages only
/// match exactly; section pages also match their sub-pages.
fn is_active(href: &str, path: &str, landing: &str) -> bool {
    if href == landing {
        return path == href;
    }
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone)]
pub struct NavItemView {
    pub href: &'static str,
    pub label: String,
    pub icon: &'static str,
    pub active: bool,
}

/// The translated shell for one signed-in request.
#[derive(Debug, Clone)]
pub struct ShellView {
    pub role_label: String,
    pub display_name: String,
    pub email: String,
    pub initials: String,
    pub nav: Vec<NavItemView>,
}

impl ShellView {
    #[must_use]
    pub fn new(session: &Session, path: &str, t: &Translator) -> Self {
        let landing = session.role.landing_route();
        let nav = nav_for(session.role)
            .iter()
            .map(|entry| NavItemView {
                href: entry.href,
                label: t.t(entry.label_key),
                icon: entry.icon,
                active: is_active(entry.href, path, landing),
            })
            .collect();

        Self {
            role_label: t.t(&format!("roles.{}", session.role.as_str())),
            display_name: session.display_name.clone(),
            email: session.email.to_string(),
            initials: initials(&session.display_name),
            nav,
        }
    }
}

/// Up to two initials from a display name.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Everything `base.html` needs besides the page body.
#[derive(Debug, Clone)]
pub struct PageView {
    pub title: String,
    pub lang: &'static str,
    /// Current path; the language switch returns here.
    pub path: String,
    pub shell: Option<ShellView>,
    pub flash: Option<Flash>,
    translator: Translator,
}

impl PageView {
    #[must_use]
    pub fn new(
        title_key: &str,
        path: &str,
        session: Option<&Session>,
        flash: Option<Flash>,
        translator: Translator,
    ) -> Self {
        Self {
            title: translator.t(title_key),
            lang: translator.language().code(),
            path: path.to_owned(),
            shell: session.map(|s| ShellView::new(s, path, &translator)),
            flash,
            translator,
        }
    }

    /// Translate an interface string. Used by templates.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    #[must_use]
    pub fn t_with(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        self.translator.t_with(key, replacements)
    }

    #[must_use]
    pub const fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Label of the language the switch changes to.
    #[must_use]
    pub fn other_language(&self) -> String {
        self.t(&format!("language.{}", self.translator.language().toggled().code()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use schoolcom_core::{Email, Language};

    use super::*;
    use crate::i18n::Catalog;

    fn translator() -> Translator {
        Translator::new(Arc::new(Catalog::embedded().unwrap()), Language::En)
    }

    fn session(role: Role) -> Session {
        Session {
            role,
            display_name: "Emily Davis".to_string(),
            email: Email::parse("emily.davis@school.edu").unwrap(),
        }
    }

    #[test]
    fn test_every_role_has_its_landing_first() {
        for role in Role::ALL {
            assert_eq!(nav_for(role).first().unwrap().href, role.landing_route());
        }
    }

    #[test]
    fn test_active_entry() {
        let shell = ShellView::new(&session(Role::Teacher), "/teacher/calendar/new", &translator());
        let active: Vec<_> = shell.nav.iter().filter(|n| n.active).map(|n| n.href).collect();
        assert_eq!(active, vec!["/teacher/calendar"]);

        let shell = ShellView::new(&session(Role::Teacher), "/teacher", &translator());
        let active: Vec<_> = shell.nav.iter().filter(|n| n.active).map(|n| n.href).collect();
        assert_eq!(active, vec!["/teacher"]);

        let shell = ShellView::new(&session(Role::Teacher), "/teacher/courses", &translator());
        let active: Vec<_> = shell.nav.iter().filter(|n| n.active).map(|n| n.href).collect();
        assert_eq!(active, vec!["/teacher/courses"]);
    }

    #[test]
    fn test_shell_identity() {
        let shell = ShellView::new(&session(Role::Parent), "/parent", &translator());
        assert_eq!(shell.initials, "ED");
        assert_eq!(shell.role_label, "Parent");
        assert_eq!(shell.nav.first().unwrap().label, "Home");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("system admin"), "SA");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("  "), "");
    }

    #[test]
    fn test_page_view_language_switch() {
        let page = PageView::new("nav.home", "/parent", None, None, translator());
        assert_eq!(page.lang, "en");
        assert_eq!(page.other_language(), "Español");
        assert!(page.shell.is_none());
    }
}
