//! Runs a [`LifecycleManager`] on a heartbeat.
//!
//! The tracker is what an application actually holds on to. It owns the
//! heartbeat task for as long as a session is being tracked and guarantees
//! the task is gone on every exit path:
//!
//! - explicit logout → the next [`sync`](SessionTracker::sync) cancels it
//! - idle expiry → the beat callback returns [`Beat::Stop`]
//! - teardown → dropping the tracker drops the handle, which aborts the task

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use warden_heartbeat::{Beat, HeartbeatHandle, spawn_heartbeat};
use warden_types::{Clock, SessionStateProvider};

use crate::{LifecycleManager, TickOutcome};

type Shared<P, C> = Arc<Mutex<LifecycleManager<P, C>>>;

/// Binds a lifecycle manager to a cancellable heartbeat.
///
/// Must be used from inside a Tokio runtime (the heartbeat is a spawned
/// task).
pub struct SessionTracker<P: SessionStateProvider, C: Clock> {
    manager: Shared<P, C>,
    heartbeat: Option<HeartbeatHandle>,
}

impl<P: SessionStateProvider, C: Clock> SessionTracker<P, C> {
    /// Wraps a manager. Nothing runs until the first [`sync`](Self::sync).
    pub fn new(manager: LifecycleManager<P, C>) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
            heartbeat: None,
        }
    }

    /// Reconciles the heartbeat with the provider's authentication state.
    ///
    /// Call this whenever authentication may have changed (after login,
    /// restore, or logout). Starts the heartbeat when a session appears,
    /// cancels it when the session is gone. Returns whether the heartbeat
    /// is running afterwards.
    pub fn sync(&mut self) -> bool {
        let (was_active, active) = {
            let mut manager = lock(&self.manager);
            let was_active = manager.is_active();
            (was_active, manager.sync())
        };

        if active && (!was_active || !self.is_running()) {
            // A heartbeat whose last tick expired the previous session may
            // still be unwinding; never rely on it for the new one.
            self.stop();
            self.start();
        } else if !active {
            self.stop();
        }
        self.is_running()
    }

    /// Forwards a user interaction to the manager.
    pub fn on_interaction(&self) {
        lock(&self.manager).on_interaction();
    }

    /// The host woke up from sleep: check idle time now instead of
    /// waiting for the next scheduled beat.
    pub fn on_resume(&self) {
        if let Some(heartbeat) = &self.heartbeat {
            tracing::debug!("host resumed, forcing heartbeat");
            heartbeat.beat_now();
        }
    }

    /// Whether the heartbeat task is currently running.
    pub fn is_running(&self) -> bool {
        self.heartbeat.as_ref().is_some_and(HeartbeatHandle::is_running)
    }

    /// Cancels the heartbeat, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.cancel();
        }
    }

    /// Runs `f` against the manager (for inspection in tests and UIs,
    /// e.g. showing how long until an idle logout).
    pub fn with_manager<R>(&self, f: impl FnOnce(&LifecycleManager<P, C>) -> R) -> R {
        f(&lock(&self.manager))
    }

    fn start(&mut self) {
        let config = lock(&self.manager).config().heartbeat_config();
        let manager = Arc::clone(&self.manager);

        let handle = spawn_heartbeat(config, move |info| {
            match lock(&manager).tick() {
                TickOutcome::Refreshed { .. } => Beat::Continue,
                TickOutcome::Expired { idle } => {
                    tracing::info!(
                        beat = info.beat,
                        late = info.late,
                        idle_secs = idle.as_secs(),
                        "session expired, heartbeat stopping"
                    );
                    Beat::Stop
                }
                TickOutcome::Inactive => Beat::Stop,
            }
        });

        tracing::debug!("heartbeat started");
        self.heartbeat = Some(handle);
    }
}

fn lock<P: SessionStateProvider, C: Clock>(
    manager: &Shared<P, C>,
) -> MutexGuard<'_, LifecycleManager<P, C>> {
    manager.lock().unwrap_or_else(PoisonError::into_inner)
}
