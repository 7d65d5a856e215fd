// File: client/src/envelope.rs
//! Response envelope decoding
//!
//! The service wraps payloads in a few recurring shapes: a bare object that may
//! carry an `items` array, a `Requests` object naming an asynchronous request,
//! and per-resource objects such as `Hosts` or `HostRoles`. The functions here
//! turn a raw [`TransportResponse`] into those shapes or a typed error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{AmbariError, Result};
use crate::transport::TransportResponse;

/// Opaque identifier of an asynchronous request, numeric or string depending
/// on the service version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Value);

impl RequestId {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(Value::from(id))
    }
}

/// Normalized status of an asynchronous request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestStatus {
    pub request_context: String,
    pub request_status: String,
    /// Progress, rounded and clamped to 0-100
    pub progress_percent: u8,
}

/// Element of the registered hosts listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "Hosts")]
    pub hosts: HostInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub host_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Status check without body interpretation.
///
/// 404 maps to [`AmbariError::NotFound`], any other non-2xx to
/// [`AmbariError::HttpFailure`].
pub fn check_status(response: &TransportResponse) -> Result<()> {
    if response.status == 404 {
        return Err(AmbariError::NotFound {
            url: response.url.clone(),
        });
    }
    response.error_for_status()
}

/// Status check followed by JSON decoding of the body.
///
/// An empty body decodes to an empty object. A body that is not JSON is a
/// protocol violation and fails the call.
pub fn check_response(response: &TransportResponse) -> Result<Value> {
    check_status(response)?;

    if response.text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(&response.text).map_err(|e| {
        AmbariError::malformed(format!(
            "invalid JSON from {}: {}",
            response.url, e
        ))
    })
}

/// The `items` sequence of a listing, empty when absent
pub fn extract_items(body: &Value) -> Vec<Value> {
    body.get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Extract `Requests.id` from a response body
pub fn req_id(response: &TransportResponse) -> Result<RequestId> {
    if response.text.trim().is_empty() {
        return Err(AmbariError::malformed(format!(
            "empty response from {} where a request id was expected",
            response.url
        )));
    }

    let body: Value = serde_json::from_str(&response.text).map_err(|e| {
        AmbariError::malformed(format!(
            "cannot parse request id response from {}: {}",
            response.url, e
        ))
    })?;

    let requests = body
        .get("Requests")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AmbariError::malformed(format!(
                "response from {} has no Requests object: {}",
                response.url, body
            ))
        })?;

    requests
        .get("id")
        .cloned()
        .map(RequestId)
        .ok_or_else(|| {
            AmbariError::malformed(format!(
                "Requests object from {} has no id: {}",
                response.url, body
            ))
        })
}

/// Decode the `Requests` object of a request status query
pub fn decode_request_status(body: &Value) -> Result<RequestStatus> {
    let requests = body
        .get("Requests")
        .and_then(Value::as_object)
        .ok_or_else(|| AmbariError::malformed("request status has no Requests object"))?;

    let field_str = |name: &str| {
        requests
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AmbariError::malformed(format!("request status has no {}", name)))
    };

    let request_context = field_str("request_context")?;
    let request_status = field_str("request_status")?;

    let progress = requests
        .get("progress_percent")
        .and_then(Value::as_f64)
        .ok_or_else(|| AmbariError::malformed("request status has no progress_percent"))?;

    Ok(RequestStatus {
        request_context,
        request_status,
        progress_percent: progress.clamp(0.0, 100.0).round() as u8,
    })
}
