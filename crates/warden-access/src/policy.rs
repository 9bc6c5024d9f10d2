//! Route policies: what a route demands of its visitor.

use serde::{Deserialize, Serialize};

use crate::AccessError;

/// Where signed-out visitors go when a protected route has no
/// `fallback_auth`.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Where signed-in visitors go when a guest-only route has no
/// `fallback_no_auth`.
pub const DEFAULT_HOME_PATH: &str = "/";

/// Access rule attached to one route.
///
/// Declared in route tables as camelCase JSON; omitted fields default to
/// `false`/`None`, so `{}` is a public route.
///
/// ```rust
/// use warden_access::RoutePolicy;
///
/// let profile = RoutePolicy::protected();
/// let login = RoutePolicy::guest_only().with_fallback_no_auth("/profile");
/// assert!(profile.validate("/profile").is_ok());
/// assert!(login.validate("/auth/login").is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutePolicy {
    /// Route is off-limits without an authenticated session.
    pub require_auth: bool,

    /// Route is off-limits *with* an authenticated session.
    pub require_no_auth: bool,

    /// Redirect target when `require_auth` fails.
    pub fallback_auth: Option<String>,

    /// Redirect target when `require_no_auth` fails.
    pub fallback_no_auth: Option<String>,
}

impl RoutePolicy {
    /// Open to everyone.
    pub fn public() -> Self {
        Self::default()
    }

    /// Signed-in visitors only.
    pub fn protected() -> Self {
        Self {
            require_auth: true,
            ..Self::default()
        }
    }

    /// Signed-out visitors only (login, register).
    pub fn guest_only() -> Self {
        Self {
            require_no_auth: true,
            ..Self::default()
        }
    }

    /// Sets where signed-out visitors are sent.
    pub fn with_fallback_auth(mut self, target: impl Into<String>) -> Self {
        self.fallback_auth = Some(target.into());
        self
    }

    /// Sets where signed-in visitors are sent.
    pub fn with_fallback_no_auth(mut self, target: impl Into<String>) -> Self {
        self.fallback_no_auth = Some(target.into());
        self
    }

    /// Redirect target for a failed `require_auth` check.
    pub fn login_target(&self) -> &str {
        self.fallback_auth.as_deref().unwrap_or(DEFAULT_LOGIN_PATH)
    }

    /// Redirect target for a failed `require_no_auth` check.
    pub fn home_target(&self) -> &str {
        self.fallback_no_auth.as_deref().unwrap_or(DEFAULT_HOME_PATH)
    }

    /// Rejects policies no visitor could satisfy. `route` names the route
    /// in the error.
    ///
    /// # Errors
    /// [`AccessError::ConflictingPolicy`] if both flags are set.
    pub fn validate(&self, route: &str) -> Result<(), AccessError> {
        if self.require_auth && self.require_no_auth {
            return Err(AccessError::ConflictingPolicy(route.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_policy_requires_nothing() {
        let policy = RoutePolicy::public();
        assert!(!policy.require_auth);
        assert!(!policy.require_no_auth);
    }

    #[test]
    fn test_missing_fallbacks_use_defaults() {
        assert_eq!(RoutePolicy::protected().login_target(), "/auth/login");
        assert_eq!(RoutePolicy::guest_only().home_target(), "/");
    }

    #[test]
    fn test_explicit_fallbacks_win() {
        let policy = RoutePolicy::protected().with_fallback_auth("/connect-wallet");
        assert_eq!(policy.login_target(), "/connect-wallet");
    }

    #[test]
    fn test_validate_rejects_both_flags() {
        let policy = RoutePolicy {
            require_auth: true,
            require_no_auth: true,
            ..RoutePolicy::default()
        };
        assert!(matches!(
            policy.validate("/weird"),
            Err(AccessError::ConflictingPolicy(ref r)) if r == "/weird"
        ));
    }

    #[test]
    fn test_empty_json_is_public() {
        let policy: RoutePolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RoutePolicy::public());
    }

    #[test]
    fn test_camel_case_json_fields() {
        let policy: RoutePolicy =
            serde_json::from_str(r#"{"requireNoAuth": true, "fallbackNoAuth": "/profile"}"#)
                .unwrap();
        assert_eq!(policy, RoutePolicy::guest_only().with_fallback_no_auth("/profile"));
    }
}
