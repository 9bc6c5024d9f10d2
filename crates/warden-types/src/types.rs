//! Identity and time types.
//!
//! These values get persisted alongside a session and read back on
//! restore, so they all derive `Serialize`/`Deserialize` and serialize
//! as their bare inner value (`#[serde(transparent)]`).

use std::fmt;
use std::ops::Add;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier of an authenticated account.
///
/// Newtype over `String` so an account id can't be confused with a wallet
/// address or a route path, even though all three are strings underneath.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    /// Creates an account id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A wall-clock instant, in milliseconds since the Unix epoch.
///
/// Session timestamps must survive a save/restore cycle, which rules out
/// `std::time::Instant` (it has no meaning outside the current process).
/// Milliseconds are plenty of resolution for minute-scale idle limits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The Unix epoch itself. Handy as a fixed origin in tests.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from raw epoch milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Raw epoch milliseconds.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Converts a `SystemTime`. Times before the epoch clamp to [`Self::EPOCH`].
    pub fn from_system_time(time: SystemTime) -> Self {
        let ms = time
            .duration_since(UNIX_EPOCH)
            .map(saturating_millis)
            .unwrap_or(0);
        Self(ms)
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    ///
    /// Saturating on purpose: a clock that steps backwards must read as
    /// "no time passed", never as a huge idle period.
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(saturating_millis(rhs)))
    }
}

/// Whole milliseconds in `d`, capped at `u64::MAX`.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
