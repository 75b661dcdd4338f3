pub mod auth;
pub mod config;
pub mod dispatch;
pub mod testing;
pub mod tracker;

pub use auth::{Credential, CredentialError};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use dispatch::{
    DispatchClient, DispatchError, HttpDispatchClient, RequestKind, RequestStatus, TrackedRequest,
};
pub use tracker::{
    CancelAction, CancelError, RequestTracker, TrackerConfig, TrackerError, TrackerEvent,
    TrackerState,
};
