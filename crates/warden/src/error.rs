//! Unified error type for Warden.

use warden_access::AccessError;
use warden_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// A session-level error (config, login, restore).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An access-level error (route declarations).
    #[error(transparent)]
    Access(#[from] AccessError),
}
