// File: client/src/poller.rs
//! Asynchronous request polling
//!
//! Mutating calls (cluster creation, component state changes, service restarts)
//! answer with a request id; the work itself runs on the server. The poller
//! queries `/clusters/{cluster}/requests/{id}` until the request reaches a
//! terminal status.
//!
//! # State machine
//!
//! ```text
//! Unknown --poll--> InProgress --sleep/poll--> InProgress
//!                       |                          |
//!                       +--> Completed (Ok)        +--> Failed (Err)
//! ```
//!
//! Which status strings count as completed or failed is configuration
//! ([`StatusTokens`]); anything not listed keeps the loop polling. An optional
//! deadline and a [`CancellationToken`] bound how long a caller can be held,
//! including while a status query itself is hanging.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::future::{pending, Future};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::constants;
use crate::envelope::{RequestId, RequestStatus};
use crate::errors::{AmbariError, Result};

/// Where a status string leaves the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    InProgress,
    Completed,
    Failed,
    /// Not a configured token; treated as still running
    Unknown,
}

/// Status tokens by meaning, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTokens {
    pub completed: Vec<String>,
    pub failed: Vec<String>,
    pub in_progress: Vec<String>,
}

impl Default for StatusTokens {
    fn default() -> Self {
        let owned = |tokens: &[&str]| tokens.iter().map(|t| t.to_string()).collect();
        Self {
            completed: owned(constants::status::COMPLETED),
            failed: owned(constants::status::FAILED),
            in_progress: owned(constants::status::IN_PROGRESS),
        }
    }
}

impl StatusTokens {
    pub fn classify(&self, status: &str) -> RequestPhase {
        let listed = |tokens: &[String]| tokens.iter().any(|t| t.eq_ignore_ascii_case(status));

        if listed(&self.completed) {
            RequestPhase::Completed
        } else if listed(&self.failed) {
            RequestPhase::Failed
        } else if listed(&self.in_progress) {
            RequestPhase::InProgress
        } else {
            RequestPhase::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub initial_delay: Duration,
    /// Overall deadline; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub tokens: StatusTokens,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: constants::polling::POLL_INTERVAL,
            initial_delay: constants::polling::INITIAL_DELAY,
            timeout: None,
            tokens: StatusTokens::default(),
        }
    }
}

/// Anything that can report the status of a request
#[async_trait]
pub trait RequestStatusSource: Send + Sync {
    async fn check_request_status(
        &self,
        cluster_name: &str,
        request_id: &RequestId,
    ) -> Result<RequestStatus>;
}

pub struct RequestPoller<'a, S: RequestStatusSource + ?Sized> {
    source: &'a S,
    settings: &'a PollSettings,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, S: RequestStatusSource + ?Sized> RequestPoller<'a, S> {
    pub fn new(source: &'a S, settings: &'a PollSettings) -> Self {
        Self {
            source,
            settings,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: Option<&'a CancellationToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Poll one request until it completes or fails
    #[instrument(skip(self), fields(request = %request_id, cluster = %cluster_name))]
    pub async fn wait(&self, request_id: &RequestId, cluster_name: &str) -> Result<RequestStatus> {
        let label = request_id.to_string();
        let started = Instant::now();

        if !self.settings.initial_delay.is_zero() {
            self.pause(self.settings.initial_delay, &label, started).await?;
        }

        loop {
            let status = self
                .bounded(
                    self.source.check_request_status(cluster_name, request_id),
                    &label,
                    started,
                )
                .await?;

            info!(
                "Task {} in {} state. Completed {}%",
                status.request_context, status.request_status, status.progress_percent
            );

            match self.settings.tokens.classify(&status.request_status) {
                RequestPhase::Completed => return Ok(status),
                RequestPhase::Failed => {
                    return Err(AmbariError::RequestFailed {
                        request_id: label,
                        context: status.request_context,
                        status: status.request_status,
                    });
                }
                RequestPhase::InProgress => {}
                RequestPhase::Unknown => {
                    warn!(
                        "Unrecognized status '{}' for request {}, treating as in progress",
                        status.request_status, label
                    );
                }
            }

            self.pause(self.settings.interval, &label, started).await?;
        }
    }

    /// Poll a batch of requests until all complete; fails on the first round
    /// in which any of them has failed, naming every failed request
    #[instrument(skip(self, request_ids), fields(cluster = %cluster_name, count = request_ids.len()))]
    pub async fn wait_all(&self, request_ids: &[RequestId], cluster_name: &str) -> Result<()> {
        let label = request_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let started = Instant::now();

        if !self.settings.initial_delay.is_zero() {
            self.pause(self.settings.initial_delay, &label, started).await?;
        }

        let mut outstanding: Vec<RequestId> = request_ids.to_vec();
        while !outstanding.is_empty() {
            let round = try_join_all(
                outstanding
                    .iter()
                    .map(|id| self.source.check_request_status(cluster_name, id)),
            );
            let statuses = self.bounded(round, &label, started).await?;

            let mut pending = Vec::new();
            let mut failed = Vec::new();
            for (id, status) in outstanding.into_iter().zip(statuses) {
                match self.settings.tokens.classify(&status.request_status) {
                    RequestPhase::Completed => {}
                    RequestPhase::Failed => failed.push(format!(
                        "request {} ({}) in {} state",
                        id, status.request_context, status.request_status
                    )),
                    RequestPhase::InProgress | RequestPhase::Unknown => pending.push(id),
                }
            }

            if !failed.is_empty() {
                return Err(AmbariError::RequestsFailed {
                    description: failed.join("; "),
                });
            }
            if pending.is_empty() {
                break;
            }

            debug!("Waiting for {} ambari request(s) to be completed", pending.len());
            self.pause(self.settings.interval, &label, started).await?;
            outstanding = pending;
        }

        Ok(())
    }

    /// Run a status query, giving up when the deadline passes or the token
    /// fires while it is still outstanding
    async fn bounded<T, F>(&self, query: F, label: &str, started: Instant) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let cancelled = async {
            match self.cancel {
                Some(token) => token.cancelled().await,
                None => pending::<()>().await,
            }
        };
        let expired = async {
            match self.settings.timeout {
                Some(timeout) => sleep_until(started + timeout).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            result = query => result,
            _ = cancelled => Err(AmbariError::PollCancelled {
                request_id: label.to_string(),
            }),
            _ = expired => Err(AmbariError::PollTimeout {
                request_id: label.to_string(),
                waited_secs: started.elapsed().as_secs(),
            }),
        }
    }

    async fn pause(&self, duration: Duration, label: &str, started: Instant) -> Result<()> {
        let duration = match self.settings.timeout {
            Some(timeout) => {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Err(AmbariError::PollTimeout {
                        request_id: label.to_string(),
                        waited_secs: elapsed.as_secs(),
                    });
                }
                duration.min(timeout - elapsed)
            }
            None => duration,
        };

        match self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(AmbariError::PollCancelled {
                    request_id: label.to_string(),
                }),
                _ = sleep(duration) => Ok(()),
            },
            None => {
                sleep(duration).await;
                Ok(())
            }
        }
    }
}
