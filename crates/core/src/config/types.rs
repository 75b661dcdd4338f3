use serde::{Deserialize, Serialize};

use crate::tracker::TrackerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthTokenConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Dispatch API endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the dispatch backend (e.g., "http://localhost:3001")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Access token configuration.
///
/// The token is optional here because it is usually injected via the
/// `LIFELINE_AUTH_TOKEN` environment variable rather than written to disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthTokenConfig {
    #[serde(default)]
    pub token: Option<String>,
}

/// Sanitized config for display (token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: ApiConfig,
    pub auth: SanitizedAuthConfig,
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: config.api.clone(),
            auth: SanitizedAuthConfig {
                token_configured: config
                    .auth
                    .token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
            },
            tracker: config.tracker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[api]
base_url = "http://localhost:3001"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.auth.token.is_none());
        assert_eq!(config.tracker.failure_bound, 5);
    }

    #[test]
    fn test_deserialize_missing_api_fails() {
        let toml = r#"
[auth]
token = "abc"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[api]
base_url = "https://dispatch.example.com"
timeout_secs = 10

[auth]
token = "secret-token"

[tracker]
booking_poll_interval_ms = 1000
failure_bound = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://dispatch.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.auth.token.as_deref(), Some("secret-token"));
        assert_eq!(config.tracker.booking_poll_interval_ms, 1000);
        assert_eq!(config.tracker.failure_bound, 3);
        // Unspecified tracker fields keep their defaults
        assert_eq!(config.tracker.report_poll_interval_ms, 2000);
    }

    #[test]
    fn test_sanitized_config_redacts_token() {
        let toml = r#"
[api]
base_url = "http://localhost:3001"

[auth]
token = "very-secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.auth.token_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("very-secret"));
    }

    #[test]
    fn test_sanitized_config_empty_token_not_configured() {
        let toml = r#"
[api]
base_url = "http://localhost:3001"

[auth]
token = ""
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(!sanitized.auth.token_configured);
    }
}
