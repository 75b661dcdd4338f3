mod credential;

pub use credential::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("missing access token")]
    MissingToken,
}
