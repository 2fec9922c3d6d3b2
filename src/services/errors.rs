//! Errors reported by external collaborator services.

use thiserror::Error;

/// Failure reported by a collaborator (job service, object store, parameter
/// store, dataset service).
///
/// Transient variants may succeed when the call is repeated; permanent ones
/// never will.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Service could not be reached or returned a server-side failure
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// Service throttled the request
    #[error("{service} throttled the request: {message}")]
    Throttled { service: String, message: String },

    /// Request was refused (validation, permissions, malformed payload)
    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },

    /// Referenced resource does not exist
    #[error("{service} resource not found: {resource}")]
    NotFound { service: String, resource: String },
}

impl ServiceError {
    pub fn unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn throttled(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Throttled {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn rejected(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn not_found(service: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::NotFound {
            service: service.into(),
            resource: resource.into(),
        }
    }

    /// Whether repeating the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Throttled { .. })
    }

    /// Name of the service that produced the error
    pub fn service(&self) -> &str {
        match self {
            Self::Unavailable { service, .. }
            | Self::Throttled { service, .. }
            | Self::Rejected { service, .. }
            | Self::NotFound { service, .. } => service,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
