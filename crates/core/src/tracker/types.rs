//! Types for the request lifecycle tracker.

use serde::Serialize;
use thiserror::Error;

use crate::dispatch::{DispatchError, RequestStatus};

/// Errors that can occur when starting a tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracked request has no id.
    #[error("missing request id")]
    MissingRequestId,

    /// No access credential was supplied.
    #[error("missing access credential")]
    MissingCredential,

    /// `start()` was called while the tracker was already polling.
    /// Starting twice without stopping first is a caller error.
    #[error("tracker is already running")]
    AlreadyTracking,
}

/// Errors that can occur when submitting a cancel action.
#[derive(Debug, Error)]
pub enum CancelError {
    #[error("missing request id")]
    MissingRequestId,

    #[error("missing access credential")]
    MissingCredential,

    /// A cancel is already in flight or has succeeded; the action only
    /// re-arms after a failed submission.
    #[error("cancel already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Lifecycle state of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// Not tracking (never started, or stopped without a terminal outcome).
    Idle,
    /// Actively polling the status endpoint.
    Polling,
    /// A success-terminal status was observed.
    Succeeded,
    /// The request was cancelled server-side.
    Cancelled,
    /// The consecutive-failure bound was reached.
    Failed,
}

impl TrackerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerState::Idle => "idle",
            TrackerState::Polling => "polling",
            TrackerState::Succeeded => "succeeded",
            TrackerState::Cancelled => "cancelled",
            TrackerState::Failed => "failed",
        }
    }
}

/// Cosmetic 1-based step indicator.
///
/// Cycles through a fixed rotation on its own timer; purely for progressive
/// disclosure in the presenter, never derived from server data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Phase(u8);

impl Phase {
    /// The phase every tracking session starts in.
    pub fn first() -> Self {
        Phase(1)
    }

    /// 1-based position.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Advance within a rotation of `count` phases, wrapping back to 1.
    pub fn next(self, count: u8) -> Self {
        if self.0 >= count {
            Phase(1)
        } else {
            Phase(self.0 + 1)
        }
    }
}

/// Events emitted by a running tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// The cosmetic phase rotation ticked.
    Phase(Phase),
    /// A poll returned a non-terminal status; the latest one always
    /// supersedes what was previously displayed.
    StatusObserved(RequestStatus),
    /// A success-terminal status was observed; tracking has stopped.
    Succeeded { status: RequestStatus },
    /// The request was cancelled server-side; tracking has stopped.
    Cancelled,
    /// The consecutive-failure bound was reached; tracking has stopped.
    Failed { reason: String },
}

impl TrackerEvent {
    /// Whether this event ends the tracking session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrackerEvent::Succeeded { .. } | TrackerEvent::Cancelled | TrackerEvent::Failed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycles_and_wraps() {
        let mut phase = Phase::first();
        assert_eq!(phase.get(), 1);
        phase = phase.next(3);
        assert_eq!(phase.get(), 2);
        phase = phase.next(3);
        assert_eq!(phase.get(), 3);
        phase = phase.next(3);
        assert_eq!(phase.get(), 1);
    }

    #[test]
    fn test_phase_single_step_rotation() {
        let phase = Phase::first();
        assert_eq!(phase.next(1).get(), 1);
    }

    #[test]
    fn test_tracker_state_as_str() {
        assert_eq!(TrackerState::Idle.as_str(), "idle");
        assert_eq!(TrackerState::Polling.as_str(), "polling");
        assert_eq!(TrackerState::Succeeded.as_str(), "succeeded");
        assert_eq!(TrackerState::Cancelled.as_str(), "cancelled");
        assert_eq!(TrackerState::Failed.as_str(), "failed");
    }

    #[test]
    fn test_event_terminality() {
        assert!(!TrackerEvent::Phase(Phase::first()).is_terminal());
        assert!(!TrackerEvent::StatusObserved(RequestStatus::Pending).is_terminal());
        assert!(TrackerEvent::Succeeded {
            status: RequestStatus::Assigned
        }
        .is_terminal());
        assert!(TrackerEvent::Cancelled.is_terminal());
        assert!(TrackerEvent::Failed {
            reason: "timeout".to_string()
        }
        .is_terminal());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TrackerError::MissingRequestId.to_string(),
            "missing request id"
        );
        assert_eq!(
            TrackerError::AlreadyTracking.to_string(),
            "tracker is already running"
        );
        assert_eq!(
            CancelError::AlreadySubmitted.to_string(),
            "cancel already submitted"
        );
    }
}
