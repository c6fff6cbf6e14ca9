//! Error types and result types for facade operations.
//!
//! Every query either succeeds with a typed result or fails with exactly one
//! [`FacadeError`]. Use [`FacadeError::kind`] to tell validation, transport,
//! upstream-status and malformed-response failures apart.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur while serving a query.
///
/// None of these are retried by the facade. Each one fails the single query being served
/// and nothing else.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// A required identifier argument was missing or empty. No outbound call was made.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The outbound call could not be completed (connection refused, reset, DNS, ...).
    #[error("Upstream transport error: {0}")]
    Transport(String),
    /// The outbound call did not complete before its deadline.
    #[error("Upstream timed out: {0}")]
    Timeout(String),
    /// The document service answered with a non-success status.
    /// `message` carries the upstream response body, or the status reason when it was empty.
    #[error("Upstream returned status {status}: {message}")]
    UpstreamStatus {
        /// The HTTP status code returned by the document service.
        status: u16,
        /// The upstream error message.
        message: String,
    },
    /// The document service answered successfully but the body could not be read as the
    /// expected structure.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
    /// A request could not be encoded for the document service.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A gateway could not be constructed.
    #[error("Initialization error: {0}")]
    Initialization(String),
}

/// The caller-visible category of a [`FacadeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad arguments, rejected before any outbound call.
    Validation,
    /// The document service could not be reached in time.
    Transport,
    /// The document service refused or failed the request.
    UpstreamStatus,
    /// The document service broke its response contract.
    MalformedResponse,
    /// The facade itself failed.
    Internal,
}

impl ErrorKind {
    /// Returns the stable snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "transport",
            ErrorKind::UpstreamStatus => "upstream_status",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Internal => "internal",
        }
    }
}

impl FacadeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacadeError::Validation(_) => ErrorKind::Validation,
            FacadeError::Transport(_) | FacadeError::Timeout(_) => ErrorKind::Transport,
            FacadeError::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            FacadeError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            FacadeError::Serialization(_) | FacadeError::Initialization(_) => ErrorKind::Internal,
        }
    }

    /// Returns the upstream status code, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FacadeError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Shorthand for a [`FacadeError::Validation`] about a missing argument.
    pub(crate) fn missing(argument: &str) -> Self {
        FacadeError::Validation(format!("`{argument}` is required and must not be empty"))
    }
}

/// A specialized `Result` type for facade operations.
pub type FacadeResult<T> = Result<T, FacadeError>;

impl From<SerdeJsonError> for FacadeError {
    fn from(err: SerdeJsonError) -> Self {
        FacadeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_transport_failures() {
        let err = FacadeError::Timeout("fetchPage after 30s".into());
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.kind().as_str(), "transport");
    }

    #[test]
    fn upstream_status_is_exposed() {
        let err = FacadeError::UpstreamStatus {
            status: 401,
            message: "invalid token".into(),
        };

        assert_eq!(err.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(err.upstream_status(), Some(401));
        assert_eq!(err.to_string(), "Upstream returned status 401: invalid token");
        assert_eq!(FacadeError::missing("pageId").upstream_status(), None);
    }

    #[test]
    fn missing_argument_names_the_argument() {
        let err = FacadeError::missing("collectionViewId");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("`collectionViewId`"));
    }
}
