//! `Warden` builder and application handle.
//!
//! This ties the layers together: one in-memory session store shared by
//! the session tracker (which expires idle sessions) and the access
//! controller (which gates navigation on the result).

use std::sync::Arc;

use warden_access::{AccessController, Decision, Navigator, RouteTable};
use warden_session::{
    LifecycleManager, MemorySessionStore, Session, SessionConfig, SessionTracker,
};
use warden_types::{AccountId, Clock, SessionState, SessionStateProvider};

use crate::WardenError;

type Store<C> = Arc<MemorySessionStore<C>>;

/// Builder for configuring a [`Warden`].
///
/// # Example
///
/// ```rust,ignore
/// let app = WardenBuilder::new()
///     .session_config(SessionConfig { heartbeat_secs: 60, idle_limit_secs: 600 })
///     .routes(routes)
///     .build(SystemClock, router)?;
/// ```
pub struct WardenBuilder {
    session_config: SessionConfig,
    routes: RouteTable,
    routes_json: Option<String>,
}

impl WardenBuilder {
    /// Creates a builder with default timings and no routes.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            routes: RouteTable::new(),
            routes_json: None,
        }
    }

    /// Sets the session timing configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Uses an already built route table.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self.routes_json = None;
        self
    }

    /// Uses a route table declared as JSON (parsed in [`build`](Self::build)).
    pub fn routes_json(mut self, json: &str) -> Self {
        self.routes_json = Some(json.to_string());
        self
    }

    /// Validates the configuration and assembles the application handle.
    ///
    /// # Errors
    /// - [`WardenError::Session`]: invalid session timings
    /// - [`WardenError::Access`]: unparsable or conflicting routes
    pub fn build<C, N>(self, clock: C, navigator: N) -> Result<Warden<C, N>, WardenError>
    where
        C: Clock + Clone,
        N: Navigator,
    {
        let routes = match self.routes_json {
            Some(json) => RouteTable::from_json(&json)?,
            None => self.routes,
        };

        let store = Arc::new(MemorySessionStore::new(clock.clone()));
        let manager = LifecycleManager::new(Arc::clone(&store), clock, self.session_config)?;

        tracing::info!(routes = routes.len(), "warden ready");

        Ok(Warden {
            tracker: SessionTracker::new(manager),
            access: AccessController::new(Arc::clone(&store), navigator, routes),
            store,
        })
    }
}

impl Default for WardenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured session + access stack.
///
/// Every method that can change authentication re-syncs the heartbeat, so
/// it runs exactly while a session exists. Methods that may start the
/// heartbeat must be called inside a Tokio runtime.
pub struct Warden<C: Clock, N: Navigator> {
    store: Store<C>,
    tracker: SessionTracker<Store<C>, C>,
    access: AccessController<Store<C>, N>,
}

impl<C: Clock + Clone, N: Navigator> Warden<C, N> {
    /// Marks the initial auth check as in flight. Navigation shows a
    /// loading state until it resolves.
    pub fn begin_loading(&self) {
        self.store.begin_loading();
    }

    /// Resolves the initial auth check with nobody logged in.
    pub fn finish_loading(&mut self) {
        self.store.finish_loading();
        self.tracker.sync();
    }

    /// Logs an account in and starts idle tracking.
    ///
    /// # Errors
    /// [`WardenError::Session`] if a session is already active.
    pub fn login(
        &mut self,
        account_id: AccountId,
        address: impl Into<String>,
    ) -> Result<Session, WardenError> {
        let session = self.store.login(account_id, address)?;
        self.tracker.sync();
        Ok(session)
    }

    /// Reinstates a persisted session; idle time keeps counting from its
    /// recorded last activity.
    ///
    /// # Errors
    /// [`WardenError::Session`] if the session is invalid.
    pub fn restore(&mut self, session: Session) -> Result<(), WardenError> {
        self.store.restore(session)?;
        self.tracker.sync();
        Ok(())
    }

    /// Logs out (no-op without a session) and stops idle tracking.
    pub fn logout(&mut self) {
        self.store.logout();
        self.tracker.sync();
    }

    /// Records a user interaction.
    pub fn on_interaction(&self) {
        self.tracker.on_interaction();
    }

    /// The host woke up from sleep: check idle time right away.
    pub fn on_resume(&self) {
        self.tracker.on_resume();
    }

    /// Guards a navigation to `path`.
    pub fn navigate(&self, path: &str) -> Decision {
        self.access.guard(path)
    }

    /// Where to go after a successful login (see
    /// [`RouteTable::post_login_target`]).
    pub fn after_login<'a>(&self, return_to: Option<&'a str>, default: &'a str) -> &'a str {
        self.access.after_login(return_to, default)
    }

    /// Current authentication state.
    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    /// A copy of the current session, for persisting.
    pub fn current_session(&self) -> Option<Session> {
        self.store.current()
    }

    /// Whether the idle-tracking heartbeat is running.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_running()
    }
}
