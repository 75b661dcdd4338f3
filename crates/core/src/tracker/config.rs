//! Tracker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::RequestKind;

/// Configuration for the request lifecycle tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// How often to poll a booking's status (milliseconds).
    #[serde(default = "default_booking_interval")]
    pub booking_poll_interval_ms: u64,

    /// How often to poll a report's status (milliseconds).
    /// Reports are polled more aggressively than bookings.
    #[serde(default = "default_report_interval")]
    pub report_poll_interval_ms: u64,

    /// Period of the cosmetic phase rotation (milliseconds).
    /// The rotation free-runs independently of the status poll.
    #[serde(default = "default_phase_interval")]
    pub phase_interval_ms: u64,

    /// Number of phases the rotation cycles through.
    #[serde(default = "default_phase_count")]
    pub phase_count: u8,

    /// Consecutive poll failures tolerated before tracking aborts.
    /// The failure numbered `failure_bound` is the last one; no further
    /// poll is issued after it.
    #[serde(default = "default_failure_bound")]
    pub failure_bound: u32,

    /// How long the presenter should linger on a success before
    /// navigating away (milliseconds). Applied by the consumer, not the
    /// poller.
    #[serde(default = "default_success_linger")]
    pub success_linger_ms: u64,
}

fn default_booking_interval() -> u64 {
    5000
}

fn default_report_interval() -> u64 {
    2000
}

fn default_phase_interval() -> u64 {
    2000
}

fn default_phase_count() -> u8 {
    3
}

fn default_failure_bound() -> u32 {
    5
}

fn default_success_linger() -> u64 {
    2000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            booking_poll_interval_ms: default_booking_interval(),
            report_poll_interval_ms: default_report_interval(),
            phase_interval_ms: default_phase_interval(),
            phase_count: default_phase_count(),
            failure_bound: default_failure_bound(),
            success_linger_ms: default_success_linger(),
        }
    }
}

impl TrackerConfig {
    /// Poll interval for the given request kind.
    pub fn poll_interval_for(&self, kind: RequestKind) -> Duration {
        let ms = match kind {
            RequestKind::Booking => self.booking_poll_interval_ms,
            RequestKind::Report => self.report_poll_interval_ms,
        };
        Duration::from_millis(ms)
    }

    /// Period of the phase rotation.
    pub fn phase_interval(&self) -> Duration {
        Duration::from_millis(self.phase_interval_ms)
    }

    /// Presenter delay after a success signal.
    pub fn success_linger(&self) -> Duration {
        Duration::from_millis(self.success_linger_ms)
    }
}
