//! One-shot cancel action for a tracked request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::Credential;
use crate::dispatch::{DispatchClient, TrackedRequest};

use super::types::CancelError;

/// Sends a single cancellation request for a tracked request.
///
/// Guards against double submission: once a cancel is in flight or has
/// succeeded the action stays disabled; it re-arms itself only when the
/// dispatch call fails, so the caller may retry.
pub struct CancelAction {
    client: Arc<dyn DispatchClient>,
    credential: Credential,
    request: TrackedRequest,
    submitted: AtomicBool,
}

impl CancelAction {
    pub fn new(
        client: Arc<dyn DispatchClient>,
        credential: Credential,
        request: TrackedRequest,
    ) -> Self {
        Self {
            client,
            credential,
            request,
            submitted: AtomicBool::new(false),
        }
    }

    /// Submit the cancellation.
    ///
    /// Preconditions are checked before any network call: a missing id or
    /// credential is a validation error. On success the caller should stop
    /// any active tracker for the same request.
    pub async fn execute(&self) -> Result<(), CancelError> {
        if self.request.id.trim().is_empty() {
            return Err(CancelError::MissingRequestId);
        }
        if self.credential.is_empty() {
            return Err(CancelError::MissingCredential);
        }
        if self.submitted.swap(true, Ordering::SeqCst) {
            return Err(CancelError::AlreadySubmitted);
        }

        match self.client.cancel(&self.request, &self.credential).await {
            Ok(()) => {
                info!(id = %self.request.id, "cancel succeeded");
                Ok(())
            }
            Err(e) => {
                // Re-arm so the caller can retry.
                self.submitted.store(false, Ordering::SeqCst);
                warn!(id = %self.request.id, error = %e, "cancel failed");
                Err(CancelError::Dispatch(e))
            }
        }
    }

    /// Whether a cancel is in flight or has succeeded.
    pub fn is_submitted(&self) -> bool {
        self.submitted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchError;
    use crate::testing::MockDispatchClient;

    fn action_for(client: Arc<MockDispatchClient>, id: &str) -> CancelAction {
        CancelAction::new(client, Credential::new("test-token"), TrackedRequest::booking(id))
    }

    #[tokio::test]
    async fn test_missing_id_is_validation_error_without_network() {
        let client = Arc::new(MockDispatchClient::new());
        let action = action_for(Arc::clone(&client), "");

        let result = action.execute().await;
        assert!(matches!(result, Err(CancelError::MissingRequestId)));
        assert_eq!(client.cancel_calls().await, 0);
        assert!(!action.is_submitted());
    }

    #[tokio::test]
    async fn test_missing_credential_is_validation_error_without_network() {
        let client = Arc::new(MockDispatchClient::new());
        let action = CancelAction::new(
            Arc::clone(&client) as Arc<dyn DispatchClient>,
            Credential::new("  "),
            TrackedRequest::booking("42"),
        );

        let result = action.execute().await;
        assert!(matches!(result, Err(CancelError::MissingCredential)));
        assert_eq!(client.cancel_calls().await, 0);
    }

    #[tokio::test]
    async fn test_success_disables_resubmission() {
        let client = Arc::new(MockDispatchClient::new());
        let action = action_for(Arc::clone(&client), "42");

        action.execute().await.unwrap();
        assert!(action.is_submitted());

        let second = action.execute().await;
        assert!(matches!(second, Err(CancelError::AlreadySubmitted)));
        assert_eq!(client.cancel_calls().await, 1);
    }

    #[tokio::test]
    async fn test_failure_rearms_for_retry() {
        let client = Arc::new(MockDispatchClient::new());
        client
            .set_cancel_error(DispatchError::Api {
                status: 500,
                message: "database unavailable".to_string(),
            })
            .await;
        let action = action_for(Arc::clone(&client), "42");

        let first = action.execute().await;
        assert!(matches!(first, Err(CancelError::Dispatch(_))));
        assert!(!action.is_submitted());

        // The backend recovered; the retry goes through.
        client.clear_cancel_error().await;
        action.execute().await.unwrap();
        assert_eq!(client.cancel_calls().await, 2);
    }

    #[tokio::test]
    async fn test_failure_conveys_server_error_message() {
        let client = Arc::new(MockDispatchClient::new());
        client
            .set_cancel_error(DispatchError::Api {
                status: 422,
                message: "report already assigned".to_string(),
            })
            .await;
        let action = action_for(client, "42");

        let err = action.execute().await.unwrap_err();
        assert!(err.to_string().contains("report already assigned"));
    }
}
