//! Access controller: applies route policies against live session state.
//!
//! [`evaluate`](crate::evaluate) only decides. The controller also reads
//! the current state from a [`SessionStateProvider`] and, when the answer
//! is a redirect, hands it to a [`Navigator`], which performs the actual
//! history change.

use warden_types::SessionStateProvider;

use crate::{Decision, RoutePolicy, RouteTable, evaluate};

/// Extra data carried along with a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectOptions {
    /// The path the visitor originally asked for, when it should be
    /// resumed after login. Lives only in the navigation transition;
    /// discarded if unused.
    pub return_to: Option<String>,
}

/// Performs navigation on behalf of the controller.
///
/// Implemented by whatever owns history in the host (a browser router, a
/// terminal UI's screen stack, a test recorder).
pub trait Navigator {
    /// Navigate to `target`.
    fn redirect(&self, target: &str, opts: RedirectOptions);
}

/// Guards navigations using a route table and a session provider.
pub struct AccessController<P: SessionStateProvider, N: Navigator> {
    provider: P,
    navigator: N,
    routes: RouteTable,
}

impl<P: SessionStateProvider, N: Navigator> AccessController<P, N> {
    /// Creates a controller over an already validated route table.
    pub fn new(provider: P, navigator: N, routes: RouteTable) -> Self {
        Self {
            provider,
            navigator,
            routes,
        }
    }

    /// Guards a navigation to `path` using the table's policy for it.
    pub fn guard(&self, path: &str) -> Decision {
        let policy = self.routes.policy_for(path);
        self.guard_with(path, policy)
    }

    /// Guards a navigation to `path` under an explicit `policy`.
    ///
    /// On a redirect the navigator is called; with
    /// `preserve_original_location`, `path` goes along as `return_to`.
    pub fn guard_with(&self, path: &str, policy: &RoutePolicy) -> Decision {
        let decision = evaluate(policy, &self.provider.state());

        if let Decision::RedirectTo {
            target,
            preserve_original_location,
        } = &decision
        {
            tracing::info!(from = path, to = %target, "access redirect");
            let opts = RedirectOptions {
                return_to: preserve_original_location.then(|| path.to_string()),
            };
            self.navigator.redirect(target, opts);
        }

        decision
    }

    /// Where to go right after a successful login, given the `return_to`
    /// that came with the redirect to the login page.
    pub fn after_login<'a>(&self, return_to: Option<&'a str>, default: &'a str) -> &'a str {
        self.routes.post_login_target(return_to, default)
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}
