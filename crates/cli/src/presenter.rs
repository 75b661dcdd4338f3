//! Terminal presentation of tracker events.
//!
//! Maps the tracker's event stream to the lines shown while a request is
//! being processed. The phase captions are progressive-disclosure copy on a
//! cosmetic rotation; only terminal events reflect actual server state.

use lifeline_core::tracker::Phase;
use lifeline_core::{RequestKind, TrackerEvent};

/// Renders tracker events for one request kind.
pub struct Presenter {
    kind: RequestKind,
}

impl Presenter {
    pub fn new(kind: RequestKind) -> Self {
        Self { kind }
    }

    /// The caption shown before the first phase tick.
    pub fn intro(&self) -> String {
        caption(self.kind, 1).to_string()
    }

    /// The line to print for an event, if it warrants one.
    ///
    /// Non-terminal status observations are logged rather than printed; the
    /// rotation copy already covers the waiting state.
    pub fn line_for(&self, event: &TrackerEvent) -> Option<String> {
        match event {
            TrackerEvent::Phase(phase) => Some(caption(self.kind, phase.get()).to_string()),
            TrackerEvent::StatusObserved(_) => None,
            TrackerEvent::Succeeded { .. } => Some(self.success_line()),
            TrackerEvent::Cancelled => Some(format!("{} was cancelled.", self.noun())),
            TrackerEvent::Failed { reason } => Some(format!(
                "Unable to check {} status: {}. Please try again later.",
                self.kind.as_str(),
                reason
            )),
        }
    }

    fn success_line(&self) -> String {
        match self.kind {
            RequestKind::Booking => {
                "Ambulance confirmed! Your ambulance has been booked and is on the way.".to_string()
            }
            RequestKind::Report => {
                "Report accepted! An ambulance has been dispatched to your location.".to_string()
            }
        }
    }

    fn noun(&self) -> &'static str {
        match self.kind {
            RequestKind::Booking => "Booking",
            RequestKind::Report => "Report",
        }
    }
}

/// Rotation copy for a 1-based phase.
fn caption(kind: RequestKind, phase: u8) -> &'static str {
    match kind {
        RequestKind::Booking => match phase {
            1 => "Searching for nearest ambulance...",
            2 => "Ambulances found near your location, confirming...",
            _ => "Finalizing your booking...",
        },
        RequestKind::Report => match phase {
            1 => "Sending your report...",
            2 => "Analyzing incident severity...",
            _ => "Searching for nearest emergency responders...",
        },
    }
}
