use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::ApiError;

/// Source of the bearer credential attached to every request.
///
/// Asked once per request so implementations can refresh or rotate tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<SecretString, ApiError>;
}

/// A fixed token taken from configuration
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: &SecretString) -> Self {
        Self {
            token: SecretString::new(token.expose_secret().clone()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<SecretString, ApiError> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(ApiError::Credential("configured token is empty".to_string()));
        }
        Ok(SecretString::new(self.token.expose_secret().clone()))
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}
