//! Error types for the session layer.

use warden_types::AccountId;

/// Errors that can occur while setting up or mutating sessions.
///
/// The heartbeat path itself never fails: ticking, refreshing, and
/// logging out are total. These errors come from configuration and from
/// explicit login/restore calls.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session configuration is unusable, e.g. a heartbeat period
    /// that is not shorter than the idle limit.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// A login was attempted while another session is still active.
    /// Log out first.
    #[error("account {0} already has an active session")]
    AlreadyAuthenticated(AccountId),

    /// A session handed to `restore` breaks a session invariant.
    #[error("invalid session: {0}")]
    InvalidSession(String),
}
