//! Client for the Ambari cluster-management REST API
//!
//! # Architecture
//!
//! ```text
//! AmbariClient ──▶ HttpTransport (acquired per port from a TransportProvider)
//!      │                 │
//!      │            TransportResponse
//!      │                 ▼
//!      │           envelope decoding ──▶ RequestId
//!      ▼                                    │
//! RequestPoller ◀───────────────────────────┘
//!      │
//!      └─ polls /clusters/{c}/requests/{id} until COMPLETED or failed
//! ```

pub mod client;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod instance;
pub mod poller;
pub mod transport;

// Re-export commonly used types
pub use client::{AmbariClient, ClientOptions};
pub use envelope::{HostRegistration, RequestId, RequestStatus};
pub use errors::{AmbariError, Result};
pub use instance::{ClusterHost, ManagementInstance};
pub use poller::{PollSettings, RequestPhase, RequestPoller, RequestStatusSource, StatusTokens};
pub use transport::{
    BasicAuth, HttpTransport, ReqwestTransport, ReqwestTransportProvider, TransportProvider,
    TransportRequest, TransportResponse,
};
