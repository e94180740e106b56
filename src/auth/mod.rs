//! ERPNext API credentials.
//!
//! ERPNext authenticates REST calls with a key/secret pair generated per user.
//! The pair is sent as `Authorization: token <api_key>:<api_secret>` on every
//! request; nothing here interprets the values.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use validator::Validate;

use crate::errors::ServiceError;

/// Domain and API key pair for one ERPNext site.
#[derive(Clone, Deserialize, Validate)]
pub struct ErpNextCredentials {
    /// Site base URL, e.g. `https://erp.example.com`
    #[validate(url)]
    pub domain: String,
    #[validate(length(min = 1, message = "API key is required"))]
    pub api_key: String,
    #[validate(length(min = 1, message = "API secret is required"))]
    pub api_secret: String,
}

impl ErpNextCredentials {
    pub fn new(
        domain: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Token value combining key and secret
    pub fn token(&self) -> String {
        format!("{}:{}", self.api_key, self.api_secret)
    }

    /// Format the authorization header value
    pub fn to_auth_header(&self) -> String {
        format!("token {}", self.token())
    }

    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.domain.trim_end_matches('/')
    }
}

impl fmt::Debug for ErpNextCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErpNextCredentials")
            .field("domain", &self.domain)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Supplies the credentials used to reach ERPNext.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credentials(&self) -> Result<ErpNextCredentials, ServiceError>;
}

#[async_trait]
impl CredentialProvider for ErpNextCredentials {
    async fn credentials(&self) -> Result<ErpNextCredentials, ServiceError> {
        self.validate()?;
        Ok(self.clone())
    }
}
