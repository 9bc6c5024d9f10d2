//! Route table: which policy guards which path.
//!
//! Patterns come in two shapes:
//!
//! - exact: `/profile` matches only `/profile`
//! - prefix: `/dao/*` matches `/dao` and everything below it
//!
//! Lookup prefers an exact match, then the longest matching prefix.
//! Paths nobody registered are public.

use std::collections::BTreeMap;

use crate::{AccessError, RoutePolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Exact(String),
    /// Stored without the trailing `/*`. `/*` itself is stored as `""`.
    Prefix(String),
}

impl Pattern {
    fn parse(raw: &str) -> Result<Self, AccessError> {
        if !raw.starts_with('/') {
            return Err(AccessError::InvalidPattern(raw.to_string()));
        }
        match raw.strip_suffix("/*") {
            Some(prefix) if !prefix.contains('*') => Ok(Self::Prefix(prefix.to_string())),
            Some(_) => Err(AccessError::InvalidPattern(raw.to_string())),
            None if raw.contains('*') => Err(AccessError::InvalidPattern(raw.to_string())),
            None => Ok(Self::Exact(raw.to_string())),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => p == path,
            Self::Prefix(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// Registry of route policies.
///
/// ```rust
/// use warden_access::{RoutePolicy, RouteTable};
///
/// let mut routes = RouteTable::new();
/// routes.register("/profile", RoutePolicy::protected()).unwrap();
/// routes.register("/dao/*", RoutePolicy::protected()).unwrap();
///
/// assert!(routes.policy_for("/dao/proposals/7").require_auth);
/// assert!(!routes.policy_for("/marketplace").require_auth);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(Pattern, RoutePolicy)>,
    public: RoutePolicy,
}

impl RouteTable {
    /// Creates an empty table (every path public).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `policy` for `pattern`.
    ///
    /// # Errors
    /// - [`AccessError::InvalidPattern`]: not `/...`, or a misplaced `*`
    /// - [`AccessError::ConflictingPolicy`]: both auth flags set
    /// - [`AccessError::DuplicateRoute`]: pattern already registered
    pub fn register(&mut self, pattern: &str, policy: RoutePolicy) -> Result<(), AccessError> {
        let parsed = Pattern::parse(pattern)?;
        policy.validate(pattern)?;
        if self.routes.iter().any(|(p, _)| *p == parsed) {
            return Err(AccessError::DuplicateRoute(pattern.to_string()));
        }

        tracing::debug!(
            pattern,
            require_auth = policy.require_auth,
            require_no_auth = policy.require_no_auth,
            "route registered"
        );
        self.routes.push((parsed, policy));
        Ok(())
    }

    /// Builds a table from a JSON object mapping patterns to policies:
    ///
    /// ```json
    /// {
    ///   "/profile":    { "requireAuth": true },
    ///   "/auth/login": { "requireNoAuth": true, "fallbackNoAuth": "/profile" }
    /// }
    /// ```
    ///
    /// # Errors
    /// [`AccessError::Parse`] for malformed JSON, plus anything
    /// [`register`](Self::register) rejects.
    pub fn from_json(json: &str) -> Result<Self, AccessError> {
        let declared: BTreeMap<String, RoutePolicy> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (pattern, policy) in declared {
            table.register(&pattern, policy)?;
        }
        Ok(table)
    }

    /// The policy guarding `path`. Query strings and fragments are ignored.
    pub fn policy_for(&self, path: &str) -> &RoutePolicy {
        let path = strip_query(path);

        let exact = self
            .routes
            .iter()
            .find(|(p, _)| matches!(p, Pattern::Exact(_)) && p.matches(path));
        if let Some((_, policy)) = exact {
            return policy;
        }

        self.routes
            .iter()
            .filter_map(|(p, policy)| match p {
                Pattern::Prefix(prefix) if p.matches(path) => Some((prefix.len(), policy)),
                _ => None,
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, policy)| policy)
            .unwrap_or(&self.public)
    }

    /// Where to send a visitor who just logged in.
    ///
    /// Honors `return_to` (the location preserved by a protected-route
    /// redirect) when it is a local absolute path that a signed-in visitor
    /// may see. Otherwise falls back to `default`. Guest-only targets are
    /// refused so that login never bounces straight back to the login page.
    pub fn post_login_target<'a>(&self, return_to: Option<&'a str>, default: &'a str) -> &'a str {
        match return_to {
            Some(path) if is_local_path(path) && !self.policy_for(path).require_no_auth =>
            {
                path
            }
            Some(path) => {
                tracing::debug!(return_to = path, "ignoring unusable return-to path");
                default
            }
            None => default,
        }
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// `/...` but not protocol-relative. Browsers read `\` as `/`, so `/\host`
/// counts as `//host`.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'))
}
