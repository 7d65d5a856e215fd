// File: client/src/transport.rs
//! HTTP transport seam
//!
//! The client never talks to the network directly. A [`TransportProvider`]
//! hands out a transport bound to a management port and takes it back when the
//! client goes away. [`ReqwestTransportProvider`] is the direct-connection
//! implementation used by the binary; tests substitute scripted transports.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::errors::{AmbariError, Result};

/// HTTP basic auth credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for BasicAuth {
    fn default() -> Self {
        Self::new(
            crate::constants::defaults::USERNAME,
            crate::constants::defaults::PASSWORD,
        )
    }
}

/// A fully resolved request handed to the transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub verify: bool,
    pub auth: BasicAuth,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response, status not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub url: String,
    pub status: u16,
    pub text: String,
}

impl TransportResponse {
    pub fn new(url: impl Into<String>, status: u16, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with the status and body when the response is not 2xx
    pub fn error_for_status(&self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(AmbariError::HttpFailure {
            url: self.url.clone(),
            status: self.status,
            body: self.text.clone(),
        })
    }
}

/// A connection-capable transport bound to one endpoint
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Supplies and reclaims port-bound transports
pub trait TransportProvider: Send + Sync {
    fn acquire(&self, port: u16) -> Result<Arc<dyn HttpTransport>>;

    fn release(&self, port: u16);
}

/// Transport over a reqwest client
pub struct ReqwestTransport {
    verified: Client,
    insecure: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        // Only connecting is bounded: the service may hold mutating calls open
        // for a while, and poll waits are bounded by the poller
        let build = |accept_invalid: bool| {
            Client::builder()
                .danger_accept_invalid_certs(accept_invalid)
                .connect_timeout(crate::constants::http::CONNECT_TIMEOUT)
                .build()
                .map_err(|e| AmbariError::Transport {
                    url: String::new(),
                    reason: format!("Failed to create HTTP client: {}", e),
                })
        };

        Ok(Self {
            verified: build(false)?,
            insecure: build(true)?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let client = if request.verify {
            &self.verified
        } else {
            &self.insecure
        };

        let mut builder = client
            .request(request.method.clone(), &request.url)
            .basic_auth(&request.auth.username, Some(&request.auth.password));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| AmbariError::Transport {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| AmbariError::Transport {
            url: request.url.clone(),
            reason: format!("Failed to read response body: {}", e),
        })?;

        Ok(TransportResponse {
            url: request.url,
            status,
            text,
        })
    }
}

/// Hands out direct reqwest transports and counts live sessions per port
#[derive(Default)]
pub struct ReqwestTransportProvider {
    sessions: Mutex<HashMap<u16, usize>>,
}

impl ReqwestTransportProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds valid counts
    fn sessions(&self) -> MutexGuard<'_, HashMap<u16, usize>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of clients currently holding a session on `port`
    pub fn open_sessions(&self, port: u16) -> usize {
        self.sessions().get(&port).copied().unwrap_or(0)
    }

    pub fn is_open(&self, port: u16) -> bool {
        self.open_sessions(port) > 0
    }
}

impl TransportProvider for ReqwestTransportProvider {
    fn acquire(&self, port: u16) -> Result<Arc<dyn HttpTransport>> {
        let transport = ReqwestTransport::new()?;
        let mut sessions = self.sessions();
        let count = sessions.entry(port).or_insert(0);
        *count += 1;
        debug!("Opened HTTP session for port {} ({} open)", port, count);
        Ok(Arc::new(transport))
    }

    fn release(&self, port: u16) {
        let mut sessions = self.sessions();
        let remaining = match sessions.get_mut(&port) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => {
                warn!("Release of port {} without an open session", port);
                return;
            }
        };

        if remaining == 0 {
            sessions.remove(&port);
            debug!("Closed last HTTP session for port {}", port);
        } else {
            debug!("Closed HTTP session for port {} ({} still open)", port, remaining);
        }
    }
}
