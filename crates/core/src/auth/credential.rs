//! Access credential for the dispatch backend.
//!
//! The session token is issued by an external authentication provider and is
//! passed into each component explicitly rather than read from ambient
//! global state. The credential is read-only for the lifetime of a session.

use std::fmt;

use super::CredentialError;

/// Bearer token used on every dispatch API call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap a raw session token. Emptiness is checked at use sites
    /// (tracker start, cancel submit), not here, so callers can thread an
    /// optional token through without unwrapping.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Build a credential, rejecting empty or whitespace-only tokens.
    pub fn try_new(token: impl Into<String>) -> Result<Self, CredentialError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialError::MissingToken);
        }
        Ok(Self { token })
    }

    /// True when no usable token is present.
    pub fn is_empty(&self) -> bool {
        self.token.trim().is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// The token is a secret; keep it out of logs and error chains.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let credential = Credential::new("abc123");
        assert_eq!(credential.bearer(), "Bearer abc123");
    }

    #[test]
    fn test_is_empty() {
        assert!(Credential::new("").is_empty());
        assert!(Credential::new("   ").is_empty());
        assert!(!Credential::new("abc").is_empty());
    }

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(matches!(
            Credential::try_new(""),
            Err(CredentialError::MissingToken)
        ));
        assert!(Credential::try_new("tok").is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("super-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
