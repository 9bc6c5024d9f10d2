//! The access decision: a pure function of (policy, session state).

use std::fmt;

use warden_types::SessionState;

use crate::RoutePolicy;

/// Resolved authentication status for one navigation.
///
/// ```text
/// Loading ──(auth check resolves)──→ Authorized | Unauthorized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// The auth check is still in flight.
    Loading,
    /// Resolved, with an authenticated session.
    Authorized,
    /// Resolved, without one. Also the status of any state that does not
    /// positively say "authenticated".
    Unauthorized,
}

impl From<&SessionState> for AuthStatus {
    fn from(state: &SessionState) -> Self {
        if state.is_loading {
            Self::Loading
        } else if state.is_authenticated {
            Self::Authorized
        } else {
            Self::Unauthorized
        }
    }
}

/// What to do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Auth state unresolved: show a neutral loading indicator and
    /// neither the route nor a redirect.
    ShowLoading,
    /// Render the route.
    Render,
    /// Navigate to `target` instead.
    RedirectTo {
        /// Where to go.
        target: String,
        /// Attach the originally requested path so navigation can resume
        /// there after login.
        preserve_original_location: bool,
    },
}

impl Decision {
    /// `true` for [`Decision::Render`].
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowLoading => write!(f, "ShowLoading"),
            Self::Render => write!(f, "Render"),
            Self::RedirectTo { target, .. } => write!(f, "RedirectTo({target})"),
        }
    }
}

/// Decides what a navigation to a route guarded by `policy` should do.
///
/// Loading always wins. Then a protected route turns signed-out visitors
/// away to its login target (remembering where they were headed), and a
/// guest-only route turns signed-in visitors away to its home target.
/// Everything else renders.
///
/// Pure and idempotent: evaluating on every render is fine.
pub fn evaluate(policy: &RoutePolicy, state: &SessionState) -> Decision {
    match AuthStatus::from(state) {
        AuthStatus::Loading => Decision::ShowLoading,
        AuthStatus::Unauthorized if policy.require_auth => Decision::RedirectTo {
            target: policy.login_target().to_string(),
            preserve_original_location: true,
        },
        AuthStatus::Authorized if policy.require_no_auth => Decision::RedirectTo {
            target: policy.home_target().to_string(),
            preserve_original_location: false,
        },
        _ => Decision::Render,
    }
}

#[cfg(test)]
mod tests {
    use warden_types::Timestamp;

    use super::*;

    fn signed_in() -> SessionState {
        SessionState::authenticated(Timestamp(1_000))
    }

    fn signed_out() -> SessionState {
        SessionState::anonymous()
    }

    fn redirect(target: &str, preserve: bool) -> Decision {
        Decision::RedirectTo {
            target: target.to_string(),
            preserve_original_location: preserve,
        }
    }

    #[test]
    fn test_protected_signed_out_redirects_to_login_preserving_location() {
        let policy = RoutePolicy::protected().with_fallback_auth("/auth/login");
        assert_eq!(evaluate(&policy, &signed_out()), redirect("/auth/login", true));
    }

    #[test]
    fn test_protected_signed_in_renders() {
        let policy = RoutePolicy::protected().with_fallback_auth("/auth/login");
        assert_eq!(evaluate(&policy, &signed_in()), Decision::Render);
    }

    #[test]
    fn test_guest_only_signed_in_redirects_without_preserving() {
        let policy = RoutePolicy::guest_only().with_fallback_no_auth("/profile");
        assert_eq!(evaluate(&policy, &signed_in()), redirect("/profile", false));
    }

    #[test]
    fn test_guest_only_signed_out_renders() {
        let policy = RoutePolicy::guest_only();
        assert_eq!(evaluate(&policy, &signed_out()), Decision::Render);
    }

    #[test]
    fn test_loading_wins_for_every_policy() {
        let loading_signed_in = SessionState {
            is_authenticated: true,
            is_loading: true,
            ..SessionState::default()
        };
        for policy in [
            RoutePolicy::public(),
            RoutePolicy::protected(),
            RoutePolicy::guest_only(),
        ] {
            assert_eq!(evaluate(&policy, &SessionState::loading()), Decision::ShowLoading);
            assert_eq!(evaluate(&policy, &loading_signed_in), Decision::ShowLoading);
        }
    }

    #[test]
    fn test_public_route_always_renders_once_resolved() {
        let policy = RoutePolicy::public();
        assert!(evaluate(&policy, &signed_in()).is_render());
        assert!(evaluate(&policy, &signed_out()).is_render());
    }

    #[test]
    fn test_state_missing_authenticated_flag_never_renders_protected() {
        let state: SessionState = serde_json::from_str(r#"{"isLoading": false}"#).unwrap();
        let decision = evaluate(&RoutePolicy::protected(), &state);
        assert_eq!(decision, redirect(crate::DEFAULT_LOGIN_PATH, true));
    }

    #[test]
    fn test_missing_fallbacks_use_default_targets() {
        assert_eq!(
            evaluate(&RoutePolicy::protected(), &signed_out()),
            redirect("/auth/login", true)
        );
        assert_eq!(
            evaluate(&RoutePolicy::guest_only(), &signed_in()),
            redirect("/", false)
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let policy = RoutePolicy::protected();
        let state = signed_in();
        let first = evaluate(&policy, &state);
        for _ in 0..5 {
            assert_eq!(evaluate(&policy, &state), first);
        }
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Render.to_string(), "Render");
        assert_eq!(redirect("/x", true).to_string(), "RedirectTo(/x)");
    }
}
