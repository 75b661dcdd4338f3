//! Testing utilities and mock implementations.
//!
//! Provides a mock dispatch backend so tracker and cancel behavior can be
//! tested without a real server.
//!
//! # Example
//!
//! ```rust,ignore
//! use lifeline_core::testing::MockDispatchClient;
//! use lifeline_core::dispatch::RequestStatus;
//!
//! let client = MockDispatchClient::new();
//!
//! // Script the next two polls, then Pending forever.
//! client.push_status(Ok(RequestStatus::Pending)).await;
//! client.push_status(Ok(RequestStatus::Assigned)).await;
//! ```

mod mock_dispatch;

pub use mock_dispatch::MockDispatchClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::dispatch::{RequestStatus, RequestSummary};

    /// Create a history entry with reasonable defaults.
    pub fn request_summary(id: &str, status: RequestStatus) -> RequestSummary {
        RequestSummary {
            id: id.to_string(),
            status,
            description: Some("road accident near the intersection".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 30, 0).single(),
        }
    }
}
