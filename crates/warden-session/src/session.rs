//! Session types: the record of one authenticated login.
//!
//! A session tracks:
//! - WHO is logged in (`AccountId`, plus their public address)
//! - WHEN they logged in and when they were last active
//! - a random token that identifies this particular login in logs

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use warden_heartbeat::HeartbeatConfig;
use warden_types::{AccountId, Timestamp};

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Timing configuration for session liveness.
///
/// The heartbeat must be shorter than the idle limit, otherwise an idle
/// user could outlive the limit by a whole heartbeat period before being
/// noticed. The default ratio is 6:1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Seconds between liveness checks. Default: 300 (5 minutes).
    pub heartbeat_secs: u64,

    /// Seconds of inactivity after which the session is logged out.
    /// Default: 1800 (30 minutes).
    pub idle_limit_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: 5 * 60,
            idle_limit_secs: 30 * 60,
        }
    }
}

impl SessionConfig {
    /// Heartbeat period as a `Duration`.
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    /// Idle limit as a `Duration`.
    pub fn idle_limit(&self) -> Duration {
        Duration::from_secs(self.idle_limit_secs)
    }

    /// Heartbeat scheduler config matching this session config.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig::every(self.heartbeat())
    }

    /// Checks that the config can actually detect idleness.
    ///
    /// # Errors
    /// [`SessionError::InvalidConfig`] if the heartbeat is zero or not
    /// strictly shorter than the idle limit.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.heartbeat_secs == 0 {
            return Err(SessionError::InvalidConfig(
                "heartbeat_secs must be greater than zero".into(),
            ));
        }
        if self.heartbeat_secs >= self.idle_limit_secs {
            return Err(SessionError::InvalidConfig(format!(
                "heartbeat ({}s) must be shorter than idle limit ({}s)",
                self.heartbeat_secs, self.idle_limit_secs
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One authenticated login.
///
/// Created on successful login, touched on activity, destroyed on logout
/// or idle expiry. `last_activity >= login_time` always holds for a
/// session built through [`Session::new`] and [`Session::touch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Which account this session belongs to.
    pub account_id: AccountId,

    /// Public-facing identifier of the account (e.g. a wallet address).
    pub address: String,

    /// `true` once login succeeded. Missing from persisted data means
    /// `false`.
    #[serde(default)]
    pub is_authenticated: bool,

    /// When the session was created.
    pub login_time: Timestamp,

    /// Most recent recorded activity.
    pub last_activity: Timestamp,

    /// Random per-login token (32 hex chars), used to correlate log lines
    /// for one login across refreshes and restores.
    pub session_token: String,
}

impl Session {
    /// Creates a freshly authenticated session at time `at`.
    pub fn new(account_id: AccountId, address: impl Into<String>, at: Timestamp) -> Self {
        Self {
            account_id,
            address: address.into(),
            is_authenticated: true,
            login_time: at,
            last_activity: at,
            session_token: generate_token(),
        }
    }

    /// Records activity at `at`. Never moves `last_activity` backwards.
    pub fn touch(&mut self, at: Timestamp) {
        if at > self.last_activity {
            self.last_activity = at;
        }
    }

    /// Checks the timestamp invariant of a session loaded from elsewhere.
    pub(crate) fn check(&self) -> Result<(), SessionError> {
        if !self.is_authenticated {
            return Err(SessionError::InvalidSession(
                "session is not authenticated".into(),
            ));
        }
        if self.last_activity < self.login_time {
            return Err(SessionError::InvalidSession(format!(
                "last activity {} precedes login time {}",
                self.last_activity, self.login_time
            )));
        }
        Ok(())
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
