//! The session-state seam.
//!
//! Both the lifecycle manager and the access controller need to know
//! whether someone is logged in. Neither owns that fact: it belongs to
//! whatever persists sessions. [`SessionStateProvider`] is the interface
//! that owner implements, and it gets passed in explicitly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A point-in-time view of the authentication state.
///
/// Every field defaults to its "deny" value: a snapshot built from
/// incomplete data (a missing JSON field, `SessionState::default()`) reads
/// as not-loading and not-authenticated, which makes protected routes
/// redirect rather than render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionState {
    /// A login session exists and has not been logged out or expired.
    pub is_authenticated: bool,

    /// The initial "who is this?" check is still in flight.
    pub is_loading: bool,

    /// Last recorded activity of the current session, if there is one.
    pub last_activity: Option<Timestamp>,

    /// Which session this snapshot describes. Providers bump it each time
    /// they start or restore a session; `0` if they don't track it.
    pub generation: u64,
}

impl SessionState {
    /// Snapshot for "auth check still running".
    pub const fn loading() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            last_activity: None,
            generation: 0,
        }
    }

    /// Snapshot for "resolved, nobody logged in".
    pub const fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            is_loading: false,
            last_activity: None,
            generation: 0,
        }
    }

    /// Snapshot for "resolved, logged in, last active at `last_activity`".
    pub const fn authenticated(last_activity: Timestamp) -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            last_activity: Some(last_activity),
            generation: 0,
        }
    }

    /// The same snapshot, tagged with a session generation.
    pub const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

/// Owner of the current session, as seen by Warden.
///
/// Implementations persist sessions however they like (memory, local
/// storage, a backend call). Warden only issues these calls; if a
/// `refresh` or `logout` fails downstream, handling that failure (and any
/// retry) is the implementation's job.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` so one provider can be shared (behind an
/// `Arc`) between the heartbeat task and the route controller.
pub trait SessionStateProvider: Send + Sync + 'static {
    /// Current authentication state.
    fn state(&self) -> SessionState;

    /// Records continued liveness. `last_activity` is the most recent
    /// user interaction the caller has observed.
    fn refresh(&self, last_activity: Timestamp);

    /// Ends the current session. Must be a no-op when there is none.
    fn logout(&self);
}

impl<P: SessionStateProvider + ?Sized> SessionStateProvider for Arc<P> {
    fn state(&self) -> SessionState {
        (**self).state()
    }

    fn refresh(&self, last_activity: Timestamp) {
        (**self).refresh(last_activity)
    }

    fn logout(&self) {
        (**self).logout()
    }
}
