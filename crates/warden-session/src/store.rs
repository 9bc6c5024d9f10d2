//! In-memory session store.
//!
//! [`MemorySessionStore`] is the simplest possible owner of "the current
//! session": one optional [`Session`] behind a mutex, plus a loading flag
//! for the window where the app is still finding out whether anyone is
//! logged in. Persisting the session somewhere durable is left to the
//! caller (`current()` + serde on the way out, `restore()` on the way in).

use std::sync::{Mutex, MutexGuard, PoisonError};

use warden_types::{AccountId, Clock, SessionState, SessionStateProvider, Timestamp};

use crate::{Session, SessionError};

#[derive(Debug, Default)]
struct StoreInner {
    session: Option<Session>,
    loading: bool,
    /// Bumped on every login and restore.
    generation: u64,
}

/// Holds at most one session for the current user.
pub struct MemorySessionStore<C: Clock> {
    inner: Mutex<StoreInner>,
    clock: C,
}

impl<C: Clock> MemorySessionStore<C> {
    /// Creates an empty store with the auth check already resolved
    /// (nobody logged in, not loading).
    pub fn new(clock: C) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            clock,
        }
    }

    /// Marks the initial auth check as in flight. Route guards show a
    /// loading state until [`finish_loading`](Self::finish_loading),
    /// [`login`](Self::login) or [`restore`](Self::restore) resolves it.
    pub fn begin_loading(&self) {
        self.lock().loading = true;
    }

    /// Resolves the auth check without a session (nothing to restore).
    pub fn finish_loading(&self) {
        self.lock().loading = false;
    }

    /// Starts a new session for `account_id`.
    ///
    /// # Errors
    /// [`SessionError::AlreadyAuthenticated`] if a session is active.
    pub fn login(
        &self,
        account_id: AccountId,
        address: impl Into<String>,
    ) -> Result<Session, SessionError> {
        let mut inner = self.lock();
        if let Some(existing) = &inner.session {
            return Err(SessionError::AlreadyAuthenticated(
                existing.account_id.clone(),
            ));
        }

        let session = Session::new(account_id, address, self.clock.now());
        tracing::info!(
            account_id = %session.account_id,
            token = %session.session_token,
            "session created"
        );

        inner.session = Some(session.clone());
        inner.loading = false;
        inner.generation += 1;
        Ok(session)
    }

    /// Reinstates a previously persisted session, keeping its recorded
    /// `last_activity` so idle time keeps counting from there.
    ///
    /// Replaces any session currently held.
    ///
    /// # Errors
    /// [`SessionError::InvalidSession`] if the session is not
    /// authenticated or its timestamps are inconsistent.
    pub fn restore(&self, session: Session) -> Result<(), SessionError> {
        session.check()?;

        tracing::info!(
            account_id = %session.account_id,
            token = %session.session_token,
            last_activity = %session.last_activity,
            "session restored"
        );

        let mut inner = self.lock();
        inner.session = Some(session);
        inner.loading = false;
        inner.generation += 1;
        Ok(())
    }

    /// A copy of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every critical section leaves `StoreInner` consistent, so a
        // poisoned lock still holds valid data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> SessionStateProvider for MemorySessionStore<C> {
    fn state(&self) -> SessionState {
        let inner = self.lock();
        if inner.loading {
            return SessionState::loading();
        }
        match &inner.session {
            Some(s) if s.is_authenticated => {
                SessionState::authenticated(s.last_activity).with_generation(inner.generation)
            }
            _ => SessionState::anonymous(),
        }
    }

    fn refresh(&self, last_activity: Timestamp) {
        let mut inner = self.lock();
        if let Some(session) = inner.session.as_mut() {
            session.touch(last_activity);
            tracing::debug!(
                account_id = %session.account_id,
                last_activity = %session.last_activity,
                "session refreshed"
            );
        }
    }

    fn logout(&self) {
        let mut inner = self.lock();
        match inner.session.take() {
            Some(session) => {
                tracing::info!(
                    account_id = %session.account_id,
                    token = %session.session_token,
                    "session ended"
                );
            }
            None => tracing::debug!("logout with no active session"),
        }
    }
}
