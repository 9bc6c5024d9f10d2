//! The lifecycle manager: decides whether an idle session lives or dies.
//!
//! The manager owns one piece of private state, the time of the most
//! recent user interaction. Everything else it needs comes in through
//! injected collaborators:
//!
//! - a [`SessionStateProvider`] that owns the session (and gets told to
//!   `refresh` or `logout`)
//! - a [`Clock`] that says what time it is
//!
//! ```text
//! sync() ──(authenticated)──→ [Active] ──tick(), idle ≤ limit──→ refresh()
//!    ↑                           │
//!    │                           ├──tick(), idle > limit──→ logout() ──→ [Inactive]
//!    │                           │
//!    └──(new session)─────── [Inactive] ←──sync(), logged out elsewhere
//! ```
//!
//! # Concurrency note
//!
//! Like the store, the manager is plain data with `&mut self` methods.
//! [`SessionTracker`](crate::SessionTracker) wraps it in a mutex when a
//! heartbeat task needs to share it.

use std::time::Duration;

use warden_types::{Clock, SessionStateProvider, Timestamp};

use crate::{SessionConfig, SessionError};

/// What a single [`LifecycleManager::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session is being tracked. Nothing happened.
    Inactive,
    /// The user was active recently enough; the session was refreshed.
    Refreshed {
        /// Time since the last interaction.
        idle: Duration,
    },
    /// The idle limit was exceeded; the session was logged out.
    Expired {
        /// Time since the last interaction.
        idle: Duration,
    },
}

/// Tracks user activity and expires idle sessions.
pub struct LifecycleManager<P: SessionStateProvider, C: Clock> {
    provider: P,
    clock: C,
    config: SessionConfig,

    /// Most recent interaction. `Some` exactly while a session is tracked.
    last_interaction: Option<Timestamp>,

    /// Provider generation of the tracked session.
    generation: u64,
}

impl<P: SessionStateProvider, C: Clock> LifecycleManager<P, C> {
    /// Creates an inactive manager.
    ///
    /// # Errors
    /// [`SessionError::InvalidConfig`] if `config` fails validation.
    pub fn new(provider: P, clock: C, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            provider,
            clock,
            config,
            last_interaction: None,
            generation: 0,
        })
    }

    /// Reconciles with the provider's authentication state.
    ///
    /// Starts tracking when the provider reports an authenticated session
    /// and tracking is off; stops when it reports none. A different
    /// session generation (a restore over a live session) starts tracking
    /// afresh from the new session's `last_activity`. While the provider
    /// is still loading nothing changes. Returns whether a session is
    /// tracked afterwards.
    pub fn sync(&mut self) -> bool {
        let state = self.provider.state();
        if state.is_loading {
            return self.is_active();
        }

        match (state.is_authenticated, self.is_active()) {
            (true, false) => {
                self.generation = state.generation;
                self.activate(state.last_activity);
            }
            (true, true) if state.generation != self.generation => {
                tracing::debug!(
                    from = self.generation,
                    to = state.generation,
                    "session replaced, reseeding"
                );
                self.generation = state.generation;
                self.activate(state.last_activity);
            }
            (false, true) => self.deactivate(),
            _ => {}
        }
        self.is_active()
    }

    /// Starts tracking a session.
    ///
    /// The interaction clock is seeded from `last_activity` when the
    /// session carries one, so a restored session only gets the idle time
    /// it has left, not a fresh window.
    pub fn activate(&mut self, last_activity: Option<Timestamp>) {
        let seed = last_activity.unwrap_or_else(|| self.clock.now());
        self.last_interaction = Some(seed);
        tracing::debug!(seed = %seed, "session tracking started");
    }

    /// Stops tracking. Further ticks do nothing until the next activation.
    pub fn deactivate(&mut self) {
        if self.last_interaction.take().is_some() {
            tracing::debug!("session tracking stopped");
        }
    }

    /// Whether a session is currently tracked.
    pub fn is_active(&self) -> bool {
        self.last_interaction.is_some()
    }

    /// Records a user interaction (click, key press, pointer move, scroll,
    /// touch). Ignored while no session is tracked.
    ///
    /// The recorded time never moves backwards, even if the clock does.
    pub fn on_interaction(&mut self) {
        if let Some(last) = self.last_interaction.as_mut() {
            let now = self.clock.now();
            if now > *last {
                *last = now;
            }
        }
    }

    /// Time since the last recorded interaction, if a session is tracked.
    pub fn idle_for(&self) -> Option<Duration> {
        self.last_interaction
            .map(|last| self.clock.now().saturating_duration_since(last))
    }

    /// One heartbeat: refresh the session, or log it out if idle too long.
    ///
    /// A session is allowed to sit idle for exactly the idle limit; it
    /// expires once idle time goes beyond it. Idle time is measured
    /// against the wall clock, so a heartbeat that fires late (host
    /// suspended) expires the session on that beat.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::Inactive;
        }

        // Logged out by someone else since the last beat: stop quietly
        // rather than issuing a second logout.
        let state = self.provider.state();
        if !state.is_loading && !state.is_authenticated {
            self.deactivate();
            return TickOutcome::Inactive;
        }
        if state.is_authenticated && state.generation != self.generation {
            self.generation = state.generation;
            self.activate(state.last_activity);
        }
        let Some(last) = self.last_interaction else {
            return TickOutcome::Inactive;
        };

        let idle = self.clock.now().saturating_duration_since(last);
        if idle > self.config.idle_limit() {
            tracing::info!(
                idle_secs = idle.as_secs(),
                limit_secs = self.config.idle_limit_secs,
                "idle limit exceeded, logging out"
            );
            self.provider.logout();
            self.deactivate();
            TickOutcome::Expired { idle }
        } else {
            self.provider.refresh(last);
            tracing::trace!(idle_secs = idle.as_secs(), "session still active");
            TickOutcome::Refreshed { idle }
        }
    }

    /// The validated configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The injected session provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
