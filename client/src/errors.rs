//! Error types for the Ambari client
//!
//! Every failure is returned to the immediate caller. Transport-level problems,
//! HTTP status failures, malformed envelopes and failed asynchronous requests
//! each have their own variant so callers can decide how to react.

use thiserror::Error;

/// Result alias used throughout the client
pub type Result<T> = std::result::Result<T, AmbariError>;

#[derive(Debug, Error)]
pub enum AmbariError {
    /// The service answered 404 for the resource
    #[error("Ambari resource not found: {url}")]
    NotFound { url: String },

    /// Any other non-success HTTP status
    #[error("Ambari request to {url} failed with HTTP {status}: {body}")]
    HttpFailure {
        url: String,
        status: u16,
        body: String,
    },

    /// The transport could not deliver the request at all
    #[error("Transport error talking to {url}: {reason}")]
    Transport { url: String, reason: String },

    /// A 2xx response whose body does not carry the expected envelope
    #[error("Malformed Ambari response: {reason}")]
    MalformedResponse { reason: String },

    /// A polled request reached a failed terminal state
    #[error("Ambari request {request_id} ({context}) in {status} state")]
    RequestFailed {
        request_id: String,
        context: String,
        status: String,
    },

    /// One or more requests of a batch wait reached a failed terminal state
    #[error("Some Ambari request(s) not in COMPLETED state: {description}")]
    RequestsFailed { description: String },

    #[error("Timed out after {waited_secs}s waiting for Ambari request {request_id}")]
    PollTimeout { request_id: String, waited_secs: u64 },

    #[error("Waiting for Ambari request {request_id} was cancelled")]
    PollCancelled { request_id: String },

    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AmbariError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AmbariError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// True for errors that abort provisioning rather than report a transport
    /// or HTTP problem.
    pub fn is_provisioning_error(&self) -> bool {
        matches!(
            self,
            AmbariError::MalformedResponse { .. }
                | AmbariError::RequestFailed { .. }
                | AmbariError::RequestsFailed { .. }
                | AmbariError::PollTimeout { .. }
                | AmbariError::PollCancelled { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AmbariError::NotFound { .. })
    }
}
