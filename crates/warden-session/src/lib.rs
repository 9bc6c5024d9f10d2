//! Session lifecycle management for Warden.
//!
//! This crate keeps a login session alive while the user is active and
//! ends it once they have been idle too long:
//!
//! 1. **Session records**: who is logged in and when they were last
//!    active ([`Session`], [`SessionConfig`])
//! 2. **Storage**: an in-memory [`SessionStateProvider`] implementation
//!    ([`MemorySessionStore`])
//! 3. **Idle tracking**: [`LifecycleManager`] records interactions and
//!    decides, on every heartbeat, whether to refresh or log out
//! 4. **Scheduling**: [`SessionTracker`] runs the manager on a
//!    cancellable heartbeat task
//!
//! # How it fits in the stack
//!
//! ```text
//! Access Layer (warden-access)  ← reads SessionState to gate routes
//!     ↕
//! Session Layer (this crate)    ← owns the session, expires idle users
//!     ↕
//! Heartbeat (warden-heartbeat)  ← fires the periodic liveness check
//! ```
//!
//! [`SessionStateProvider`]: warden_types::SessionStateProvider

mod error;
mod manager;
mod session;
mod store;
mod tracker;

pub use error::SessionError;
pub use manager::{LifecycleManager, TickOutcome};
pub use session::{Session, SessionConfig};
pub use store::MemorySessionStore;
pub use tracker::SessionTracker;
