//! Types for dispatch API operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Credential;

/// Errors that can occur during dispatch API operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request not found: {0}")]
    RequestNotFound(String),

    #[error("No available ambulances at the moment")]
    NoAmbulanceAvailable,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// What kind of request is being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Ambulance booking placed by a patient.
    Booking,
    /// Incident report (SOS) filed from the field.
    Report,
}

impl RequestKind {
    /// URL path segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Booking => "booking",
            RequestKind::Report => "report",
        }
    }
}

/// Server-reported status of a booking or report.
///
/// The server is authoritative; the client only parses and displays these.
/// Values outside the known set are preserved verbatim and treated as
/// non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    /// Waiting for a driver.
    Pending,
    /// A driver accepted the request.
    Accepted,
    /// An ambulance has been assigned.
    Assigned,
    /// The request was cancelled.
    Cancelled,
    /// Any status string this client does not know about.
    Unknown(String),
}

impl RequestStatus {
    /// Parse the server's status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Pending" => RequestStatus::Pending,
            "Accepted" => RequestStatus::Accepted,
            "Assigned" => RequestStatus::Assigned,
            "Cancelled" => RequestStatus::Cancelled,
            other => RequestStatus::Unknown(other.to_string()),
        }
    }

    /// Returns the string representation for display.
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Assigned => "Assigned",
            RequestStatus::Cancelled => "Cancelled",
            RequestStatus::Unknown(s) => s,
        }
    }

    /// Whether this status ends tracking successfully for the given kind.
    ///
    /// A booking succeeds only on `Assigned`; a report succeeds on either
    /// `Accepted` or `Assigned`.
    pub fn is_success_terminal(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Booking => matches!(self, RequestStatus::Assigned),
            RequestKind::Report => {
                matches!(self, RequestStatus::Accepted | RequestStatus::Assigned)
            }
        }
    }

    /// Whether this status ends tracking as cancelled.
    pub fn is_cancelled_terminal(&self) -> bool {
        matches!(self, RequestStatus::Cancelled)
    }

    /// Any terminal status for the given kind.
    pub fn is_terminal(&self, kind: RequestKind) -> bool {
        self.is_success_terminal(kind) || self.is_cancelled_terminal()
    }
}

// Serialized as the server's verbatim status string so unknown values
// round-trip unchanged.
impl Serialize for RequestStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RequestStatus::parse(&raw))
    }
}

/// Identifies the booking/report whose status is being polled.
/// Immutable once tracking starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRequest {
    pub id: String,
    pub kind: RequestKind,
}

impl TrackedRequest {
    pub fn new(id: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn booking(id: impl Into<String>) -> Self {
        Self::new(id, RequestKind::Booking)
    }

    pub fn report(id: impl Into<String>) -> Self {
        Self::new(id, RequestKind::Report)
    }
}

/// Payload for creating a new report/booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDraft {
    pub kind: RequestKind,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ReportDraft {
    pub fn new(kind: RequestKind, latitude: f64, longitude: f64) -> Self {
        Self {
            kind,
            latitude,
            longitude,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Result of creating a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRequest {
    /// Server-assigned request id, used for subsequent tracking.
    pub id: String,
}

/// One entry in the caller's request history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: String,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Trait for dispatch API backends.
///
/// The access credential is passed explicitly on every call; implementations
/// never read ambient authentication state.
#[async_trait]
pub trait DispatchClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Read the current status of a tracked request.
    async fn status_of(
        &self,
        request: &TrackedRequest,
        credential: &Credential,
    ) -> Result<RequestStatus, DispatchError>;

    /// Cancel a tracked request. One-shot; the server decides whether the
    /// request is still cancellable.
    async fn cancel(
        &self,
        request: &TrackedRequest,
        credential: &Credential,
    ) -> Result<(), DispatchError>;

    /// Create a new report/booking request.
    async fn create_report(
        &self,
        draft: &ReportDraft,
        credential: &Credential,
    ) -> Result<CreatedRequest, DispatchError>;

    /// List the caller's past requests of the given kind.
    async fn list_requests(
        &self,
        kind: RequestKind,
        credential: &Credential,
    ) -> Result<Vec<RequestSummary>, DispatchError>;
}
