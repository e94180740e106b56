use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{ListQuery, ResourceClient, ResourceResponse};
use crate::auth::{CredentialProvider, ErpNextCredentials};
use crate::errors::ServiceError;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// ERPNext REST client authenticated with an API key/secret token.
#[derive(Clone)]
pub struct ErpNextClient {
    client: Client,
    base_url: Url,
}

impl ErpNextClient {
    /// Create a client for the site named by `credentials`.
    ///
    /// Every request carries the token header and is bounded by `timeout`.
    pub fn new(credentials: &ErpNextCredentials, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(credentials.base_url()).map_err(|e| {
            ServiceError::ValidationError(format!(
                "Invalid ERPNext domain '{}': {}",
                credentials.domain, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::ValidationError(format!(
                "Invalid ERPNext domain '{}'",
                credentials.domain
            )));
        }

        let mut auth = header::HeaderValue::from_str(&credentials.to_auth_header()).map_err(|_| {
            ServiceError::ValidationError("API key and secret must be printable ASCII".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create a client from whatever credentials `provider` supplies.
    pub async fn from_provider(
        provider: &dyn CredentialProvider,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let credentials = provider.credentials().await?;
        Self::new(&credentials, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/<kind>/<segments..>`, each segment percent-encoded
    /// (so `Work Order` becomes `Work%20Order`).
    fn api_url(&self, kind: &str, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").push(kind).extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<ResourceResponse, ServiceError> {
        let response = request.send().await.map_err(|e| {
            warn!("ERPNext request failed: {}", e);
            ServiceError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("ERPNext responded with {}", status);
            return Err(ServiceError::http_status(
                status.as_u16(),
                format!("ERPNext returned {}: {}", status, error_summary(&text)),
            ));
        }

        ResourceResponse::from_text(&text)
    }

    /// User the configured token authenticates as.
    #[instrument(skip(self))]
    pub async fn logged_user(&self) -> Result<String, ServiceError> {
        let url = self.api_url("method", &["frappe.auth.get_logged_user"]);
        debug!("GET {}", url);

        let response = self.send(self.client.get(url)).await?;
        response
            .body()
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::SerializationError("missing logged user".to_string()))
    }
}

#[async_trait]
impl ResourceClient for ErpNextClient {
    async fn get_document(
        &self,
        doctype: &str,
        name: &str,
    ) -> Result<ResourceResponse, ServiceError> {
        let url = self.api_url("resource", &[doctype, name]);
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn list_documents(
        &self,
        doctype: &str,
        query: &ListQuery,
    ) -> Result<ResourceResponse, ServiceError> {
        let url = self.api_url("resource", &[doctype]);
        let filters = serde_json::to_string(&query.filters)?;
        let fields = serde_json::to_string(&query.fields)?;
        debug!("GET {} filters={} fields={}", url, filters, fields);

        let request = self
            .client
            .get(url)
            .query(&[("filters", filters), ("fields", fields)]);
        self.send(request).await
    }

    async fn create_document(
        &self,
        doctype: &str,
        body: &Value,
    ) -> Result<ResourceResponse, ServiceError> {
        let url = self.api_url("resource", &[doctype]);
        debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await
    }
}

/// Short description of a Frappe error body for error messages.
fn error_summary(text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        for key in ["exception", "exc_type", "message"] {
            if let Some(message) = map.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
