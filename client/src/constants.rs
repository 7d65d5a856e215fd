//! Central repository for wire constants, defaults and polling intervals
//!
//! Constants are grouped by concern so the client, poller and binary share a
//! single source of truth.

use std::time::Duration;

/// HTTP wire constants
pub mod http {
    use super::Duration;

    /// API root appended to `http://<host>:<port>`
    pub const API_ROOT: &str = "/api/v1";

    /// Header the service requires on every mutating call
    pub const REQUESTED_BY_HEADER: &str = "X-Requested-By";

    /// Value sent in the requested-by header
    pub const REQUESTED_BY_VALUE: &str = "sahara";

    /// The management service runs with self-signed certificates
    pub const VERIFY_TLS: bool = false;

    /// Bound on establishing a connection; calls themselves are not bounded
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Session defaults
pub mod defaults {
    /// Default management port
    pub const PORT: u16 = 8080;

    pub const USERNAME: &str = "admin";
    pub const PASSWORD: &str = "admin";
}

/// Asynchronous request polling
pub mod polling {
    use super::Duration;

    /// Interval between status queries
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Delay before the first status query, for single and batch waits alike.
    /// The service reports a request as soon as it has accepted it, so an
    /// immediate first poll is valid; callers that know the work is slow can
    /// raise it through `PollSettings::initial_delay`.
    pub const INITIAL_DELAY: Duration = Duration::ZERO;
}

/// Component states understood by the service
pub mod states {
    /// Installed but not running, i.e. stopped
    pub const INSTALLED: &str = "INSTALLED";

    pub const STARTED: &str = "STARTED";
}

/// Request status tokens reported by the service
pub mod status {
    pub const COMPLETED: &[&str] = &["COMPLETED"];

    pub const FAILED: &[&str] = &[
        "FAILED",
        "ABORTED",
        "TIMEDOUT",
        "ERROR",
        "HOLDING_FAILED",
        "HOLDING_TIMEDOUT",
        "SKIPPED_FAILED",
    ];

    pub const IN_PROGRESS: &[&str] = &["PENDING", "QUEUED", "IN_PROGRESS", "HOLDING"];
}
