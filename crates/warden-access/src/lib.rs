//! Route access control for Warden.
//!
//! Each navigable route declares a [`RoutePolicy`]: open to everyone,
//! signed-in users only, or guests only (login, register). On every
//! navigation the policy and the current [`SessionState`] go through
//! [`evaluate`], which says whether to show a loading indicator, render
//! the route, or redirect somewhere else.
//!
//! # Key types
//!
//! - [`RoutePolicy`]: per-route declaration
//! - [`Decision`]: the outcome of one evaluation
//! - [`RouteTable`]: path → policy registry, loadable from JSON
//! - [`AccessController`]: evaluates against a live
//!   [`SessionStateProvider`] and hands redirects to a [`Navigator`]
//!
//! Ambiguous session state is treated as signed out: protected routes
//! redirect rather than render.
//!
//! [`SessionState`]: warden_types::SessionState
//! [`SessionStateProvider`]: warden_types::SessionStateProvider

mod controller;
mod decision;
mod error;
mod policy;
mod table;

pub use controller::{AccessController, Navigator, RedirectOptions};
pub use decision::{AuthStatus, Decision, evaluate};
pub use error::AccessError;
pub use policy::{DEFAULT_HOME_PATH, DEFAULT_LOGIN_PATH, RoutePolicy};
pub use table::RouteTable;
