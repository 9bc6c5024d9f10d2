//! Periodic heartbeat for Warden.
//!
//! A heartbeat is a fixed-period timer that re-evaluates session liveness.
//! This crate provides two layers:
//!
//! - [`HeartbeatScheduler`]: the timer itself, awaited directly
//!   (`wait_for_beat`) from inside your own loop.
//! - [`spawn_heartbeat`]: runs a scheduler on its own Tokio task and hands
//!   back an owned [`HeartbeatHandle`]. Dropping or cancelling the handle
//!   stops the task, so the timer can never outlive its owner.
//!
//! # Late beats
//!
//! If the host stalls (a suspended laptop, a throttled background tab) the
//! beat fires late. The scheduler reports that in [`BeatInfo::late_by`]
//! and re-schedules from *now* rather than firing a burst of missed beats.
//! Callers measure idle time against the wall clock, so a late beat only
//! ever makes an expiry later, never earlier.
//!
//! ```ignore
//! let handle = spawn_heartbeat(HeartbeatConfig::every(period), move |info| {
//!     manager.lock().tick();
//!     Beat::Continue
//! });
//! // on resume from sleep:
//! handle.beat_now();
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a heartbeat.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Time between beats. Default: 5 minutes.
    pub period: Duration,
    /// Fraction of `period` (0.0–1.0) a beat may be late before it is
    /// flagged and logged as late. Default: 0.10 (10%).
    pub late_threshold: f64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            period: Self::DEFAULT_PERIOD,
            late_threshold: 0.10,
        }
    }
}

impl HeartbeatConfig {
    /// Default heartbeat period.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5 * 60);

    /// Shortest period the scheduler accepts.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Create a config with the given period and default settings.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`HeartbeatScheduler::new`]:
    /// - `period` raised to at least [`Self::MIN_PERIOD`].
    /// - `late_threshold` clamped to `0.0..=1.0`.
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_ms = self.period.as_millis() as u64,
                "heartbeat period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self.late_threshold = self.late_threshold.clamp(0.0, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Beat info
// ---------------------------------------------------------------------------

/// Information about one beat, returned by [`HeartbeatScheduler::wait_for_beat`].
#[derive(Debug, Clone)]
pub struct BeatInfo {
    /// Monotonically increasing beat number (starts at 1).
    pub beat: u64,
    /// `true` if the beat was requested via `beat_now` instead of the timer.
    pub forced: bool,
    /// `true` if the beat fired later than the configured threshold.
    pub late: bool,
    /// How far past its deadline the beat fired (zero when forced).
    pub late_by: Duration,
}

/// What the beat callback wants the spawned heartbeat to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    /// Keep beating.
    Continue,
    /// Stop the task. No further beats will fire.
    Stop,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period beat timer.
pub struct HeartbeatScheduler {
    config: HeartbeatConfig,
    beat_count: u64,
    /// When the next timer beat is due.
    next_beat: TokioInstant,
    /// Signalled by `beat_now` to fire a beat ahead of schedule.
    wake: Arc<Notify>,
}

impl HeartbeatScheduler {
    /// Create a scheduler. The first beat is due one period from now.
    pub fn new(config: HeartbeatConfig) -> Self {
        let config = config.validated();
        let next_beat = TokioInstant::now() + config.period;

        debug!(
            period_secs = config.period.as_secs_f64(),
            "heartbeat scheduler created"
        );

        Self {
            config,
            beat_count: 0,
            next_beat,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Wait until the next beat is due (or forced). Returns [`BeatInfo`].
    pub async fn wait_for_beat(&mut self) -> BeatInfo {
        let deadline = self.next_beat;
        let forced = tokio::select! {
            _ = time::sleep_until(deadline) => false,
            _ = self.wake.notified() => true,
        };

        let now = TokioInstant::now();
        self.beat_count += 1;

        let late_by = if forced {
            Duration::ZERO
        } else {
            now.saturating_duration_since(deadline)
        };
        let late = late_by > self.config.period.mul_f64(self.config.late_threshold);
        if late {
            warn!(
                beat = self.beat_count,
                late_ms = late_by.as_millis() as u64,
                "heartbeat fired late, host may have been suspended"
            );
        }

        // Always schedule from now, never from the missed deadline.
        self.next_beat = now + self.config.period;

        trace!(beat = self.beat_count, forced, late, "heartbeat");

        BeatInfo {
            beat: self.beat_count,
            forced,
            late,
            late_by,
        }
    }

    /// Fire the next beat immediately instead of waiting for the timer.
    ///
    /// Used after the host wakes from sleep so that idle time is checked
    /// right away. Multiple calls before the beat fires collapse into one.
    pub fn beat_now(&self) {
        self.wake.notify_one();
    }

    /// A handle that can force a beat from elsewhere (see [`Self::beat_now`]).
    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    /// Number of beats fired so far.
    pub fn beat_count(&self) -> u64 {
        self.beat_count
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.config.period
    }
}

// ---------------------------------------------------------------------------
// Spawned heartbeat
// ---------------------------------------------------------------------------

/// Owned handle to a running heartbeat task.
///
/// The task is aborted when the handle is cancelled or dropped, whichever
/// comes first. Must be created inside a Tokio runtime.
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
    wake: Arc<Notify>,
}

impl HeartbeatHandle {
    /// Force an immediate beat (no-op if the task already stopped).
    pub fn beat_now(&self) {
        self.wake.notify_one();
    }

    /// Whether the task is still running.
    ///
    /// Becomes `false` after the callback returns [`Beat::Stop`] or the
    /// handle is cancelled.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the heartbeat. Idempotent.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            debug!("heartbeat cancelled");
        }
        self.task.abort();
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for HeartbeatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Run a heartbeat on its own task, calling `on_beat` once per beat.
///
/// The task ends when `on_beat` returns [`Beat::Stop`], or when the
/// returned handle is cancelled or dropped.
pub fn spawn_heartbeat<F>(config: HeartbeatConfig, mut on_beat: F) -> HeartbeatHandle
where
    F: FnMut(BeatInfo) -> Beat + Send + 'static,
{
    let mut scheduler = HeartbeatScheduler::new(config);
    let wake = scheduler.waker();

    let task = tokio::spawn(async move {
        loop {
            let info = scheduler.wait_for_beat().await;
            if on_beat(info) == Beat::Stop {
                debug!(beats = scheduler.beat_count(), "heartbeat stopped by callback");
                break;
            }
        }
    });

    HeartbeatHandle { task, wake }
}
