//! HTTP implementation of the dispatch client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::auth::Credential;
use crate::config::ApiConfig;

use super::{
    CreatedRequest, DispatchClient, DispatchError, ReportDraft, RequestKind, RequestStatus,
    RequestSummary, TrackedRequest,
};

/// Dispatch client talking to the backend REST API.
pub struct HttpDispatchClient {
    client: Client,
    config: ApiConfig,
}

impl HttpDispatchClient {
    /// Create a new client from API configuration.
    pub fn new(config: ApiConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| DispatchError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn map_transport_error(e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            DispatchError::Timeout
        } else if e.is_connect() {
            DispatchError::ConnectionFailed(e.to_string())
        } else {
            DispatchError::Api {
                status: 0,
                message: e.to_string(),
            }
        }
    }

    /// Map a non-2xx response to a `DispatchError`, conveying the body's
    /// `error` field when present.
    async fn error_from_response(id: Option<&str>, response: Response) -> DispatchError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DispatchError::Unauthorized,
            StatusCode::NOT_FOUND => {
                DispatchError::RequestNotFound(id.unwrap_or("unknown").to_string())
            }
            StatusCode::CONFLICT => DispatchError::NoAmbulanceAvailable,
            _ => {
                let message = Self::extract_error_message(response).await;
                DispatchError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }

    /// Read `{"error": "..."}` out of a failure body, falling back to a
    /// generic message.
    async fn extract_error_message(response: Response) -> String {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) if !body.error.is_empty() => body.error,
            _ => format!("HTTP {}", status),
        }
    }
}

/// Status endpoint response body.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

/// Create endpoint response body.
#[derive(Debug, Deserialize)]
struct CreateBody {
    #[serde(alias = "reportId", alias = "report_id")]
    id: serde_json::Value,
}

/// Listing entry as returned by the history endpoints.
#[derive(Debug, Deserialize)]
struct SummaryBody {
    id: serde_json::Value,
    status: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The backend returns ids as numbers in some endpoints and strings in
/// others; normalize to a string.
fn id_to_string(value: &serde_json::Value) -> Result<String, DispatchError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(DispatchError::MalformedResponse(format!(
            "unexpected id value: {}",
            other
        ))),
    }
}

#[async_trait]
impl DispatchClient for HttpDispatchClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn status_of(
        &self,
        request: &TrackedRequest,
        credential: &Credential,
    ) -> Result<RequestStatus, DispatchError> {
        let url = format!(
            "{}/api/{}/status/{}",
            self.base_url(),
            request.kind.as_str(),
            request.id
        );

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(Some(&request.id), response).await);
        }

        let body: StatusBody = response
            .json()
            .await
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        let status = RequestStatus::parse(&body.status);
        debug!(id = %request.id, status = %status.as_str(), "status poll");
        Ok(status)
    }

    async fn cancel(
        &self,
        request: &TrackedRequest,
        credential: &Credential,
    ) -> Result<(), DispatchError> {
        let url = format!(
            "{}/api/{}/cancel/{}",
            self.base_url(),
            request.kind.as_str(),
            request.id
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(Some(&request.id), response).await);
        }

        Ok(())
    }

    async fn create_report(
        &self,
        draft: &ReportDraft,
        credential: &Credential,
    ) -> Result<CreatedRequest, DispatchError> {
        let url = format!("{}/api/report/create", self.base_url());

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, credential.bearer())
            .json(draft)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(None, response).await);
        }

        let body: CreateBody = response
            .json()
            .await
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        Ok(CreatedRequest {
            id: id_to_string(&body.id)?,
        })
    }

    async fn list_requests(
        &self,
        kind: RequestKind,
        credential: &Credential,
    ) -> Result<Vec<RequestSummary>, DispatchError> {
        let url = match kind {
            RequestKind::Booking => format!("{}/bookings/user", self.base_url()),
            RequestKind::Report => format!("{}/reports/user", self.base_url()),
        };

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(None, response).await);
        }

        let entries: Vec<SummaryBody> = response
            .json()
            .await
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        entries
            .into_iter()
            .map(|entry| {
                Ok(RequestSummary {
                    id: id_to_string(&entry.id)?,
                    status: RequestStatus::parse(&entry.status),
                    description: entry.description,
                    created_at: entry.created_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> HttpDispatchClient {
        HttpDispatchClient::new(ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let client = test_client("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");

        let client = test_client("http://localhost:3001");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_client_name() {
        let client = test_client("http://localhost:3001");
        assert_eq!(client.name(), "http");
    }

    #[test]
    fn test_id_to_string_accepts_numbers_and_strings() {
        assert_eq!(id_to_string(&serde_json::json!(42)).unwrap(), "42");
        assert_eq!(id_to_string(&serde_json::json!("42")).unwrap(), "42");
        assert!(matches!(
            id_to_string(&serde_json::json!({ "nested": true })),
            Err(DispatchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_status_body_parsing() {
        let body: StatusBody = serde_json::from_str(r#"{"status":"Assigned"}"#).unwrap();
        assert_eq!(RequestStatus::parse(&body.status), RequestStatus::Assigned);
    }

    #[test]
    fn test_create_body_accepts_report_id_alias() {
        let body: CreateBody = serde_json::from_str(r#"{"reportId": 7}"#).unwrap();
        assert_eq!(id_to_string(&body.id).unwrap(), "7");
    }

    #[test]
    fn test_summary_body_tolerates_missing_fields() {
        let body: SummaryBody = serde_json::from_str(r#"{"id": 1, "status": "Pending"}"#).unwrap();
        assert!(body.description.is_none());
        assert!(body.created_at.is_none());
    }
}
