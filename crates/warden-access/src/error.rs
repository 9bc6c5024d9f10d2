//! Error types for the access layer.

/// Errors raised while declaring routes.
///
/// Evaluation itself never fails; every one of these is caught when a
/// route table is built, before any navigation happens.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// A policy sets both `require_auth` and `require_no_auth`, so no
    /// visitor could ever see the route.
    #[error("route {0} requires both an authenticated and an anonymous visitor")]
    ConflictingPolicy(String),

    /// A route pattern is not an absolute path (`/...`), or uses `*`
    /// anywhere but as a trailing `/*`.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),

    /// The same pattern was registered twice.
    #[error("route {0} is already registered")]
    DuplicateRoute(String),

    /// A route table document could not be parsed.
    #[error("route table parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
