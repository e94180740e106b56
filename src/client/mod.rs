//! Access to ERPNext's generic document REST API (`/api/resource`).
//!
//! Components only talk to [`ResourceClient`]; the reqwest-backed
//! [`ErpNextClient`] is one implementation. Whatever shape the answer came in
//! (a JSON object, or a JSON document wrapped in a JSON string), it reaches
//! callers as a single normalized [`ResourceResponse`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ServiceError;

mod http;

pub use http::ErpNextClient;

/// Normalized body of an ERPNext answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse {
    body: Value,
}

impl ResourceResponse {
    /// Accepts an already decoded body. A JSON string holding a JSON document
    /// is decoded once more; any other string is kept as is.
    pub fn from_value(value: Value) -> Self {
        let body = match value {
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(inner @ (Value::Object(_) | Value::Array(_))) => inner,
                _ => Value::String(raw),
            },
            other => other,
        };
        Self { body }
    }

    /// Decodes a raw response body; an empty body reads as `null`.
    pub fn from_text(text: &str) -> Result<Self, ServiceError> {
        if text.trim().is_empty() {
            return Ok(Self { body: Value::Null });
        }
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The `data` member Frappe wraps documents and lists in, if present and not null.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data").filter(|data| !data.is_null())
    }

    /// The `data` member, or the whole body when the answer is not wrapped.
    pub fn into_data_or_body(self) -> Value {
        match self.body {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) if !data.is_null() => data,
                _ => Value::Object(map),
            },
            other => other,
        }
    }

    /// Decodes the `data` member; `Ok(None)` when the answer carries none.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ServiceError> {
        self.data()
            .map(|data| serde_json::from_value(data.clone()))
            .transpose()
            .map_err(ServiceError::from)
    }
}

/// Filtered listing of a doctype (`GET /api/resource/<doctype>?filters=..&fields=..`).
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Field/value equality filters, sent JSON-encoded
    pub filters: Value,
    /// Fields to return, sent JSON-encoded
    pub fields: Vec<String>,
}

impl ListQuery {
    pub fn new(filters: Value, fields: &[&str]) -> Self {
        Self {
            filters,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Generic document operations against one ERPNext site.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// `GET /api/resource/<doctype>/<name>`
    async fn get_document(&self, doctype: &str, name: &str)
        -> Result<ResourceResponse, ServiceError>;

    /// `GET /api/resource/<doctype>` with filters and fields
    async fn list_documents(
        &self,
        doctype: &str,
        query: &ListQuery,
    ) -> Result<ResourceResponse, ServiceError>;

    /// `POST /api/resource/<doctype>` with a JSON body
    async fn create_document(
        &self,
        doctype: &str,
        body: &Value,
    ) -> Result<ResourceResponse, ServiceError>;
}
