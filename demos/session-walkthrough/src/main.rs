use std::sync::{Arc, Mutex};
use std::time::Duration;

use warden::prelude::*;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

const ROUTES: &str = r#"{
    "/profile":       { "requireAuth": true },
    "/wallet/*":      { "requireAuth": true },
    "/dao/*":         { "requireAuth": true },
    "/auth/login":    { "requireNoAuth": true, "fallbackNoAuth": "/profile" },
    "/auth/register": { "requireNoAuth": true, "fallbackNoAuth": "/profile" }
}"#;

// ---------------------------------------------------------------------------
// Terminal router
// ---------------------------------------------------------------------------

/// Keeps the pending return-to path, the way a browser router keeps it in
/// navigation state.
#[derive(Clone, Default)]
struct TerminalRouter {
    return_to: Arc<Mutex<Option<String>>>,
}

impl TerminalRouter {
    fn take_return_to(&self) -> Option<String> {
        self.return_to.lock().ok().and_then(|mut r| r.take())
    }
}

impl Navigator for TerminalRouter {
    fn redirect(&self, target: &str, opts: RedirectOptions) {
        eprintln!("  -> redirect to {target} (return to: {:?})", opts.return_to);
        if let Ok(mut slot) = self.return_to.lock() {
            *slot = opts.return_to;
        }
    }
}

fn describe(path: &str, decision: &Decision) -> String {
    match decision {
        Decision::ShowLoading => format!("{path}: loading..."),
        Decision::Render => format!("{path}: rendered"),
        Decision::RedirectTo { target, .. } => format!("{path}: sent to {target}"),
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Short timings so the walkthrough finishes in seconds.
    let config = SessionConfig {
        heartbeat_secs: 1,
        idle_limit_secs: 3,
    };
    let router = TerminalRouter::default();
    let mut app = WardenBuilder::new()
        .session_config(config)
        .routes_json(ROUTES)
        .build(SystemClock, router.clone())?;

    eprintln!("== app start, auth check in flight");
    app.begin_loading();
    eprintln!("{}", describe("/profile", &app.navigate("/profile")));

    eprintln!("== auth check resolved: nobody logged in");
    app.finish_loading();
    eprintln!("{}", describe("/wallet/send", &app.navigate("/wallet/send")));

    eprintln!("== login");
    app.login(AccountId::new("alice"), "0xa11ce")?;
    let return_to = router.take_return_to();
    let next = app.after_login(return_to.as_deref(), "/profile").to_string();
    eprintln!("{}", describe(&next, &app.navigate(&next)));
    eprintln!("{}", describe("/auth/login", &app.navigate("/auth/login")));

    eprintln!("== user active for 5s");
    for _ in 0..10 {
        app.on_interaction();
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    eprintln!("{}", describe("/dao/proposals", &app.navigate("/dao/proposals")));

    if let Some(session) = app.current_session() {
        eprintln!("persisted session: {}", serde_json::to_string(&session)?);
    }

    eprintln!("== user idle for 5s");
    tokio::time::sleep(Duration::from_secs(5)).await;
    tracing::info!(tracking = app.is_tracking(), "after idle period");
    eprintln!("{}", describe("/dao/proposals", &app.navigate("/dao/proposals")));

    Ok(())
}
