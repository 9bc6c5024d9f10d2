//! End-to-end session lifecycle tests: a real `MemorySessionStore`, a
//! `LifecycleManager` or `SessionTracker` on top, and a `ManualClock`
//! standing in for the wall clock.
//!
//! Tracker tests also run on paused Tokio time. The wall clock
//! (`ManualClock`) and the timer clock (Tokio) are moved together by hand,
//! the same way a real host's clocks move together.

use std::sync::Arc;
use std::time::Duration;

use warden_session::{
    LifecycleManager, MemorySessionStore, Session, SessionConfig, SessionTracker, TickOutcome,
};
use warden_types::{AccountId, Clock, ManualClock, SessionState, SessionStateProvider, Timestamp};

// =========================================================================
// Helpers
// =========================================================================

const MIN: Duration = Duration::from_secs(60);
const T0: Timestamp = Timestamp::from_millis(1_700_000_000_000);

type Store = Arc<MemorySessionStore<ManualClock>>;

fn setup() -> (Store, ManualClock, LifecycleManager<Store, ManualClock>) {
    let clock = ManualClock::new(T0);
    let store = Arc::new(MemorySessionStore::new(clock.clone()));
    let manager = LifecycleManager::new(Arc::clone(&store), clock.clone(), SessionConfig::default())
        .expect("default config is valid");
    (store, clock, manager)
}

fn login(store: &Store) {
    store
        .login(AccountId::new("alice"), "0xa11ce")
        .expect("login should succeed");
}

// =========================================================================
// Manager driven by hand
// =========================================================================

#[test]
fn test_idle_session_refreshes_until_limit_then_logs_out() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    assert!(mgr.sync());

    // Beats at T0+5 .. T0+30 all refresh.
    for _ in 0..6 {
        clock.advance(5 * MIN);
        assert!(matches!(mgr.tick(), TickOutcome::Refreshed { .. }));
        assert!(store.state().is_authenticated);
    }

    // Beat at T0+35 logs out.
    clock.advance(5 * MIN);
    assert_eq!(mgr.tick(), TickOutcome::Expired { idle: 35 * MIN });
    assert_eq!(store.state(), SessionState::anonymous());
}

#[test]
fn test_interaction_resets_idle_clock() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    mgr.sync();

    clock.advance(25 * MIN);
    mgr.on_interaction();
    clock.advance(5 * MIN);

    assert_eq!(mgr.tick(), TickOutcome::Refreshed { idle: 5 * MIN });
    assert_eq!(
        store.current().unwrap().last_activity,
        T0 + 25 * MIN,
        "refresh should persist the last interaction"
    );
}

#[test]
fn test_no_side_effects_after_logout_until_new_session() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    mgr.sync();

    store.logout();
    clock.advance(90 * MIN);
    assert_eq!(mgr.tick(), TickOutcome::Inactive);
    assert!(!mgr.sync());

    // New session: tracking resumes with a fresh idle window.
    login(&store);
    assert!(mgr.sync());
    clock.advance(10 * MIN);
    assert_eq!(mgr.tick(), TickOutcome::Refreshed { idle: 10 * MIN });
}

#[test]
fn test_restored_session_keeps_its_idle_time() {
    let (store, clock, mut mgr) = setup();
    store.begin_loading();
    assert!(!mgr.sync(), "nothing to track while loading");

    // Session persisted at T0; the app reloads 31 minutes later.
    let saved = Session::new(AccountId::new("alice"), "0xa11ce", T0);
    clock.set(T0 + 31 * MIN);
    store.restore(saved).unwrap();
    assert!(mgr.sync());

    assert_eq!(mgr.tick(), TickOutcome::Expired { idle: 31 * MIN });
    assert!(!store.state().is_authenticated);
}

#[test]
fn test_restore_over_live_session_reseeds_idle_clock() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    mgr.sync();
    clock.set(T0 + 29 * MIN);
    mgr.on_interaction();

    // Another session, last active at T0, replaces the live one.
    let saved = Session::new(AccountId::new("bob"), "0xb0b", T0);
    store.restore(saved).unwrap();
    assert!(mgr.sync());

    clock.set(T0 + 31 * MIN);
    assert_eq!(mgr.tick(), TickOutcome::Expired { idle: 31 * MIN });
    assert!(!store.state().is_authenticated);
}

#[test]
fn test_restore_over_live_session_does_not_carry_old_activity() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    mgr.sync();
    clock.set(T0 + 15 * MIN);
    mgr.on_interaction();

    store
        .restore(Session::new(AccountId::new("bob"), "0xb0b", T0))
        .unwrap();
    mgr.sync();
    clock.set(T0 + 20 * MIN);

    assert_eq!(mgr.tick(), TickOutcome::Refreshed { idle: 20 * MIN });
    assert_eq!(store.current().unwrap().last_activity, T0);
}

#[test]
fn test_persisted_session_round_trips_through_json() {
    let (store, clock, mut mgr) = setup();
    login(&store);
    clock.advance(12 * MIN);
    mgr.sync();
    mgr.on_interaction();
    mgr.tick();

    let json = serde_json::to_string(&store.current().unwrap()).unwrap();
    let restored: Session = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.last_activity, T0 + 12 * MIN);
    assert_eq!(restored.login_time, T0);
}

// =========================================================================
// Tracker on a heartbeat
// =========================================================================

fn tracker() -> (Store, ManualClock, SessionTracker<Store, ManualClock>) {
    let (store, clock, manager) = setup();
    (store, clock, SessionTracker::new(manager))
}

#[tokio::test(start_paused = true)]
async fn test_tracker_idle_logout_stops_heartbeat() {
    let (store, clock, mut tracker) = tracker();
    login(&store);
    assert!(tracker.sync());

    for beat in 1..=7 {
        clock.advance(5 * MIN);
        tokio::time::sleep(5 * MIN + Duration::from_secs(1)).await;
        let expected = beat < 7;
        assert_eq!(store.state().is_authenticated, expected, "after beat {beat}");
    }

    assert!(!tracker.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_tracker_interaction_keeps_session_alive() {
    let (store, clock, mut tracker) = tracker();
    login(&store);
    tracker.sync();

    for _ in 0..12 {
        clock.advance(5 * MIN);
        tracker.on_interaction();
        tokio::time::sleep(5 * MIN + Duration::from_secs(1)).await;
    }

    assert!(store.state().is_authenticated);
    assert!(tracker.is_running());
    assert_eq!(tracker.with_manager(|m| m.idle_for()), Some(Duration::ZERO));
}

#[tokio::test(start_paused = true)]
async fn test_tracker_resume_checks_idle_immediately() {
    let (store, clock, mut tracker) = tracker();
    login(&store);
    tracker.sync();

    // Host suspended for two hours; no timer beat has fired yet.
    clock.advance(120 * MIN);
    tracker.on_resume();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!store.state().is_authenticated);
    assert!(!tracker.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_tracker_explicit_logout_cancels_heartbeat() {
    let (store, _clock, mut tracker) = tracker();
    login(&store);
    tracker.sync();

    store.logout();

    assert!(!tracker.sync());
    assert!(!tracker.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_tracker_performs_no_logout() {
    let (store, clock, mut tracker) = tracker();
    login(&store);
    tracker.sync();

    drop(tracker);
    clock.advance(120 * MIN);
    tokio::time::sleep(60 * MIN).await;

    assert!(store.state().is_authenticated);
}

#[tokio::test(start_paused = true)]
async fn test_tracker_restarts_for_new_session() {
    let (store, clock, mut tracker) = tracker();
    login(&store);
    tracker.sync();
    clock.advance(120 * MIN);
    tracker.on_resume();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!tracker.is_running());

    login(&store);

    assert!(tracker.sync());
    assert_eq!(clock.now(), T0 + 120 * MIN);
    assert_eq!(tracker.with_manager(|m| m.idle_for()), Some(Duration::ZERO));
}
