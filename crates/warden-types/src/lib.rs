//! Shared types for Warden.
//!
//! Every other Warden crate speaks in terms of the types defined here:
//!
//! - [`AccountId`] and [`Timestamp`]: who is logged in, and when things happened
//! - [`Clock`]: where "now" comes from ([`SystemClock`] in production,
//!   [`ManualClock`] in tests)
//! - [`SessionState`] and [`SessionStateProvider`]: the seam between the
//!   session lifecycle layer and the route access layer
//!
//! # How it fits in the stack
//!
//! ```text
//! Access Layer (warden-access)    ← reads SessionState to gate routes
//!     ↕
//! Session Layer (warden-session)  ← implements SessionStateProvider, drives expiry
//!     ↕
//! Types (this crate)              ← AccountId, Timestamp, Clock, SessionState
//! ```

mod clock;
mod provider;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use provider::{SessionState, SessionStateProvider};
pub use types::{AccountId, Timestamp};
