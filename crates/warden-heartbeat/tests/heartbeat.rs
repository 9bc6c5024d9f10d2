//! Integration tests for the heartbeat scheduler and spawned heartbeat.
//!
//! Uses `start_paused = true` so Tokio auto-advances time whenever every
//! task is idle. A five-minute period costs nothing to wait out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use warden_heartbeat::{
    Beat, BeatInfo, HeartbeatConfig, HeartbeatScheduler, spawn_heartbeat,
};

// =========================================================================
// Helpers
// =========================================================================

const PERIOD: Duration = Duration::from_secs(5 * 60);

fn counting_callback(
    counter: Arc<AtomicU64>,
) -> impl FnMut(BeatInfo) -> Beat + Send + 'static {
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Beat::Continue
    }
}

// =========================================================================
// HeartbeatConfig
// =========================================================================

#[test]
fn test_default_config_is_five_minutes() {
    let cfg = HeartbeatConfig::default();
    assert_eq!(cfg.period, Duration::from_secs(300));
    assert!((cfg.late_threshold - 0.10).abs() < f64::EPSILON);
}

#[test]
fn test_validated_clamps_zero_period() {
    let cfg = HeartbeatConfig::every(Duration::ZERO).validated();
    assert_eq!(cfg.period, HeartbeatConfig::MIN_PERIOD);
}

#[test]
fn test_validated_clamps_threshold() {
    let cfg = HeartbeatConfig {
        late_threshold: 3.0,
        ..HeartbeatConfig::default()
    }
    .validated();
    assert!((cfg.late_threshold - 1.0).abs() < f64::EPSILON);
}

// =========================================================================
// HeartbeatScheduler
// =========================================================================

#[test]
fn test_scheduler_initial_state() {
    let s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));
    assert_eq!(s.beat_count(), 0);
    assert_eq!(s.period(), PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_beat_fires_after_one_period() {
    let mut s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));
    let start = tokio::time::Instant::now();

    let info = s.wait_for_beat().await;

    assert_eq!(info.beat, 1);
    assert!(!info.forced);
    assert!(!info.late);
    let elapsed = start.elapsed();
    assert!(elapsed >= PERIOD && elapsed < PERIOD + Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_beats_increment_monotonically() {
    let mut s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));

    for expected in 1..=4 {
        let info = s.wait_for_beat().await;
        assert_eq!(info.beat, expected);
    }
    assert_eq!(s.beat_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_host_reports_late_beat() {
    let mut s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));

    // Host "sleeps" through two full periods.
    tokio::time::advance(PERIOD * 3).await;
    let info = s.wait_for_beat().await;

    assert!(info.late);
    assert!(info.late_by >= PERIOD * 2);
    // Only one beat for the whole stall, no burst of missed beats.
    assert_eq!(s.beat_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_beat_now_fires_immediately() {
    let mut s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));
    let start = tokio::time::Instant::now();

    s.beat_now();
    let info = s.wait_for_beat().await;

    assert!(info.forced);
    assert_eq!(info.late_by, Duration::ZERO);
    assert!(start.elapsed() < PERIOD);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_beat_pends_before_period() {
    let mut s = HeartbeatScheduler::new(HeartbeatConfig::every(PERIOD));

    let result = tokio::time::timeout(PERIOD / 2, s.wait_for_beat()).await;
    assert!(result.is_err(), "no beat should fire before one period");
    assert_eq!(s.beat_count(), 0);
}

// =========================================================================
// spawn_heartbeat
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_spawned_heartbeat_beats_each_period() {
    let counter = Arc::new(AtomicU64::new(0));
    let handle = spawn_heartbeat(
        HeartbeatConfig::every(PERIOD),
        counting_callback(Arc::clone(&counter)),
    );

    tokio::time::sleep(PERIOD * 3 + Duration::from_secs(1)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert!(handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_callback_stop_ends_task() {
    let counter = Arc::new(AtomicU64::new(0));
    let seen = Arc::clone(&counter);
    let handle = spawn_heartbeat(HeartbeatConfig::every(PERIOD), move |info| {
        seen.fetch_add(1, Ordering::SeqCst);
        if info.beat == 2 { Beat::Stop } else { Beat::Continue }
    });

    tokio::time::sleep(PERIOD * 10).await;

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert!(!handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_beats() {
    let counter = Arc::new(AtomicU64::new(0));
    let handle = spawn_heartbeat(
        HeartbeatConfig::every(PERIOD),
        counting_callback(Arc::clone(&counter)),
    );

    drop(handle);
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let counter = Arc::new(AtomicU64::new(0));
    let handle = spawn_heartbeat(
        HeartbeatConfig::every(PERIOD),
        counting_callback(Arc::clone(&counter)),
    );

    handle.cancel();
    handle.cancel();
    tokio::time::sleep(PERIOD * 2).await;

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(!handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_handle_beat_now_forces_beat() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_heartbeat(HeartbeatConfig::every(PERIOD), move |info| {
        let _ = tx.send(info);
        Beat::Continue
    });
    let start = tokio::time::Instant::now();

    handle.beat_now();
    let info = rx.recv().await.expect("beat should arrive");

    assert!(info.forced);
    assert!(start.elapsed() < PERIOD);
}
