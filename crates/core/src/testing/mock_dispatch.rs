//! Mock dispatch client for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::auth::Credential;
use crate::dispatch::{
    CreatedRequest, DispatchClient, DispatchError, ReportDraft, RequestKind, RequestStatus,
    RequestSummary, TrackedRequest,
};

/// Mock implementation of the `DispatchClient` trait.
///
/// Provides controllable behavior for testing:
/// - Script per-poll outcomes (statuses or errors) consumed in order
/// - Record call counts for status/cancel/create for assertions
/// - Inject cancel failures
///
/// When the status script runs out, every further poll returns the default
/// status (`Pending` unless overridden).
pub struct MockDispatchClient {
    /// Scripted poll outcomes, consumed front to back.
    script: Arc<RwLock<VecDeque<Result<RequestStatus, DispatchError>>>>,
    /// Status returned once the script is exhausted.
    default_status: Arc<RwLock<RequestStatus>>,
    /// Number of status_of calls made.
    status_calls: Arc<RwLock<u32>>,
    /// Artificial latency before answering a poll.
    status_delay: Arc<RwLock<Duration>>,
    /// Ids passed to cancel, in call order.
    cancelled: Arc<RwLock<Vec<String>>>,
    /// If set, the next cancel fails with this error.
    cancel_error: Arc<RwLock<Option<DispatchError>>>,
    /// Drafts passed to create_report, in call order.
    created: Arc<RwLock<Vec<ReportDraft>>>,
    /// Pre-seeded listings per request kind.
    listings: Arc<RwLock<HashMap<RequestKind, Vec<RequestSummary>>>>,
    /// Counter for generated request ids.
    id_counter: Arc<RwLock<u32>>,
}

impl Default for MockDispatchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDispatchClient {
    /// Create a mock that answers `Pending` to every poll.
    pub fn new() -> Self {
        Self {
            script: Arc::new(RwLock::new(VecDeque::new())),
            default_status: Arc::new(RwLock::new(RequestStatus::Pending)),
            status_calls: Arc::new(RwLock::new(0)),
            status_delay: Arc::new(RwLock::new(Duration::ZERO)),
            cancelled: Arc::new(RwLock::new(Vec::new())),
            cancel_error: Arc::new(RwLock::new(None)),
            created: Arc::new(RwLock::new(Vec::new())),
            listings: Arc::new(RwLock::new(HashMap::new())),
            id_counter: Arc::new(RwLock::new(0)),
        }
    }

    /// Create a mock with a pre-loaded status script.
    pub async fn with_statuses(statuses: Vec<RequestStatus>) -> Self {
        let mock = Self::new();
        for status in statuses {
            mock.push_status(Ok(status)).await;
        }
        mock
    }

    /// Append one poll outcome to the script.
    pub async fn push_status(&self, outcome: Result<RequestStatus, DispatchError>) {
        self.script.write().await.push_back(outcome);
    }

    /// Append `n` connection failures to the script.
    pub async fn push_failures(&self, n: u32) {
        let mut script = self.script.write().await;
        for _ in 0..n {
            script.push_back(Err(DispatchError::ConnectionFailed(
                "connection refused".to_string(),
            )));
        }
    }

    /// Status returned once the script is exhausted.
    pub async fn set_default_status(&self, status: RequestStatus) {
        *self.default_status.write().await = status;
    }

    /// Make every poll take this long to answer, simulating a slow backend.
    pub async fn set_status_delay(&self, delay: Duration) {
        *self.status_delay.write().await = delay;
    }

    /// Configure the next cancel to fail with the given error.
    pub async fn set_cancel_error(&self, error: DispatchError) {
        *self.cancel_error.write().await = Some(error);
    }

    /// Clear any pending cancel error.
    pub async fn clear_cancel_error(&self) {
        *self.cancel_error.write().await = None;
    }

    /// Pre-seed the listing returned for a request kind.
    pub async fn set_listing(&self, kind: RequestKind, entries: Vec<RequestSummary>) {
        self.listings.write().await.insert(kind, entries);
    }

    /// Number of status polls made so far.
    pub async fn status_calls(&self) -> u32 {
        *self.status_calls.read().await
    }

    /// Number of cancel calls made so far.
    pub async fn cancel_calls(&self) -> u32 {
        self.cancelled.read().await.len() as u32
    }

    /// Ids passed to cancel, in call order.
    pub async fn cancelled_ids(&self) -> Vec<String> {
        self.cancelled.read().await.clone()
    }

    /// Drafts passed to create_report, in call order.
    pub async fn created_drafts(&self) -> Vec<ReportDraft> {
        self.created.read().await.clone()
    }
}

#[async_trait]
impl DispatchClient for MockDispatchClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn status_of(
        &self,
        _request: &TrackedRequest,
        _credential: &Credential,
    ) -> Result<RequestStatus, DispatchError> {
        *self.status_calls.write().await += 1;

        let delay = *self.status_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(outcome) = self.script.write().await.pop_front() {
            return outcome;
        }
        Ok(self.default_status.read().await.clone())
    }

    async fn cancel(
        &self,
        request: &TrackedRequest,
        _credential: &Credential,
    ) -> Result<(), DispatchError> {
        self.cancelled.write().await.push(request.id.clone());

        if let Some(error) = self.cancel_error.write().await.take() {
            return Err(error);
        }
        Ok(())
    }

    async fn create_report(
        &self,
        draft: &ReportDraft,
        _credential: &Credential,
    ) -> Result<CreatedRequest, DispatchError> {
        self.created.write().await.push(draft.clone());

        let mut counter = self.id_counter.write().await;
        *counter += 1;
        Ok(CreatedRequest {
            id: counter.to_string(),
        })
    }

    async fn list_requests(
        &self,
        kind: RequestKind,
        _credential: &Credential,
    ) -> Result<Vec<RequestSummary>, DispatchError> {
        Ok(self
            .listings
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TrackedRequest {
        TrackedRequest::booking("42")
    }

    fn credential() -> Credential {
        Credential::new("token")
    }

    #[tokio::test]
    async fn test_script_consumed_in_order_then_default() {
        let mock =
            MockDispatchClient::with_statuses(vec![RequestStatus::Pending, RequestStatus::Accepted])
                .await;

        assert_eq!(
            mock.status_of(&request(), &credential()).await.unwrap(),
            RequestStatus::Pending
        );
        assert_eq!(
            mock.status_of(&request(), &credential()).await.unwrap(),
            RequestStatus::Accepted
        );
        // Script exhausted: default kicks in.
        assert_eq!(
            mock.status_of(&request(), &credential()).await.unwrap(),
            RequestStatus::Pending
        );
        assert_eq!(mock.status_calls().await, 3);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let mock = MockDispatchClient::new();
        mock.push_failures(2).await;

        assert!(mock.status_of(&request(), &credential()).await.is_err());
        assert!(mock.status_of(&request(), &credential()).await.is_err());
        assert!(mock.status_of(&request(), &credential()).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_records_ids() {
        let mock = MockDispatchClient::new();
        mock.cancel(&request(), &credential()).await.unwrap();
        assert_eq!(mock.cancelled_ids().await, vec!["42".to_string()]);
    }

    #[tokio::test]
    async fn test_cancel_error_consumed_once() {
        let mock = MockDispatchClient::new();
        mock.set_cancel_error(DispatchError::Timeout).await;

        assert!(mock.cancel(&request(), &credential()).await.is_err());
        assert!(mock.cancel(&request(), &credential()).await.is_ok());
        assert_eq!(mock.cancel_calls().await, 2);
    }

    #[tokio::test]
    async fn test_create_report_generates_sequential_ids() {
        let mock = MockDispatchClient::new();
        let draft = ReportDraft::new(RequestKind::Report, 1.0, 2.0);

        let first = mock.create_report(&draft, &credential()).await.unwrap();
        let second = mock.create_report(&draft, &credential()).await.unwrap();
        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert_eq!(mock.created_drafts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_defaults_to_empty() {
        let mock = MockDispatchClient::new();
        let listed = mock
            .list_requests(RequestKind::Report, &credential())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
