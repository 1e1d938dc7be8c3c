//! Role gating.

use schoolcom_core::Role;

use super::session::SessionState;

/// Outcome of checking a request against the roles a page accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state not known yet; show a loading indicator.
    Pending,
    Allow,
    /// Send the visitor to the given path.
    Redirect(&'static str),
}

/// Path every rejected visitor is sent to.
pub const REJECT_PATH: &str = "/";

/// Decide whether `state` may view a page restricted to `allowed`.
#[must_use]
pub fn evaluate(allowed: &[Role], state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Pending,
        SessionState::Active(session) if allowed.contains(&session.role) => GuardDecision::Allow,
        SessionState::Active(_) | SessionState::Anonymous => GuardDecision::Redirect(REJECT_PATH),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use schoolcom_core::Email;

    use super::*;
    use crate::auth::Session;

    fn active(role: Role) -> SessionState {
        SessionState::Active(Session {
            role,
            display_name: "Test".to_string(),
            email: Email::parse("test@school.edu").unwrap(),
        })
    }

    #[test]
    fn test_loading_is_pending() {
        assert_eq!(
            evaluate(&[Role::Teacher], &SessionState::Loading),
            GuardDecision::Pending
        );
    }

    #[test]
    fn test_allowed_role_passes() {
        assert_eq!(
            evaluate(&[Role::SchoolAdmin, Role::Teacher], &active(Role::Teacher)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_wrong_role_redirects_home() {
        assert_eq!(
            evaluate(&[Role::SystemAdmin], &active(Role::Parent)),
            GuardDecision::Redirect("/")
        );
    }

    #[test]
    fn test_anonymous_redirects_home() {
        for role in Role::ALL {
            assert_eq!(
                evaluate(&[role], &SessionState::Anonymous),
                GuardDecision::Redirect("/")
            );
        }
    }
}
