use serde::Serialize;

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure, timeout or non-2xx answer from ERPNext.
    #[error("Transport error: {message}")]
    TransportError {
        status: Option<u16>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A batch was aborted because one of its items failed.
    #[error("Item {item_index} failed: {source}")]
    ItemFailed {
        item_index: usize,
        #[source]
        source: Box<ServiceError>,
    },
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::TransportError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Convenience constructor for transport failures that never reached a response.
    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError::TransportError {
            status: None,
            message: message.into(),
        }
    }

    /// Convenience constructor for non-2xx responses.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        ServiceError::TransportError {
            status: Some(status),
            message: message.into(),
        }
    }

    /// HTTP status reported by ERPNext, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TransportError { status, .. } => *status,
            Self::ItemFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Position of the failing item when a batch was aborted.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::ItemFailed { item_index, .. } => Some(*item_index),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::TransportError { status, .. } => *status == Some(404),
            Self::ItemFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_transport(&self) -> bool {
        match self {
            Self::TransportError { .. } => true,
            Self::ItemFailed { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Wraps the error with the position of the batch item that produced it.
    pub fn at_item(self, item_index: usize) -> Self {
        ServiceError::ItemFailed {
            item_index,
            source: Box::new(self),
        }
    }
}
