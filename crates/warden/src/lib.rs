//! # Warden
//!
//! Session idle-timeout and route access control for client applications.
//!
//! Warden keeps a login session alive while the user is active, logs it
//! out once they have been idle too long, and gates navigation on the
//! result: protected routes turn signed-out visitors away to the login
//! page (remembering where they were headed), guest-only routes turn
//! signed-in visitors away to their home page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden::prelude::*;
//!
//! # struct Router;
//! # impl Navigator for Router {
//! #     fn redirect(&self, _target: &str, _opts: RedirectOptions) {}
//! # }
//! # async fn run() -> Result<(), WardenError> {
//! let mut app = WardenBuilder::new()
//!     .routes_json(r#"{ "/profile": { "requireAuth": true } }"#)
//!     .build(SystemClock, Router)?;
//!
//! app.login(AccountId::new("alice"), "0xa11ce")?;
//! app.on_interaction();
//! assert!(app.navigate("/profile").is_render());
//! # Ok(())
//! # }
//! ```

mod app;
mod error;

pub use app::{Warden, WardenBuilder};
pub use error::WardenError;

pub mod prelude {
    //! Everything an application needs in one import.

    pub use crate::{Warden, WardenBuilder, WardenError};
    pub use warden_access::{
        AccessController, AccessError, Decision, Navigator, RedirectOptions, RoutePolicy,
        RouteTable, evaluate,
    };
    pub use warden_heartbeat::{HeartbeatConfig, HeartbeatHandle};
    pub use warden_session::{
        LifecycleManager, MemorySessionStore, Session, SessionConfig, SessionError,
        SessionTracker, TickOutcome,
    };
    pub use warden_types::{
        AccountId, Clock, ManualClock, SessionState, SessionStateProvider, SystemClock,
        Timestamp,
    };
}
