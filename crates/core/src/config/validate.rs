use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API base URL is a non-empty http(s) URL
/// - Timeout, polling intervals, phase count and failure bound are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url cannot be empty".to_string(),
        ));
    }

    if !config.api.base_url.starts_with("http://") && !config.api.base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must start with http:// or https://, got: {}",
            config.api.base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    let tracker = &config.tracker;
    if tracker.booking_poll_interval_ms == 0 || tracker.report_poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "tracker poll intervals cannot be 0".to_string(),
        ));
    }

    if tracker.phase_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "tracker.phase_interval_ms cannot be 0".to_string(),
        ));
    }

    if tracker.phase_count == 0 {
        return Err(ConfigError::ValidationError(
            "tracker.phase_count cannot be 0".to_string(),
        ));
    }

    if tracker.failure_bound == 0 {
        return Err(ConfigError::ValidationError(
            "tracker.failure_bound cannot be 0".to_string(),
        ));
    }

    Ok(())
}
