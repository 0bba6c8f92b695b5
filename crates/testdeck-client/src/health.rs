//! Periodic health checks against `GET /health`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::transport::HealthSource;

/// Body of `GET /health`. Only `status == "ok"` means healthy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Tri-state outcome of one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthState {
    /// The backend answered `{"status": "ok"}`.
    Healthy,
    /// The backend answered, but with any other status.
    Unhealthy,
    /// The request failed or the body could not be decoded.
    Unreachable,
}

/// Run a single health check. Never fails; transport problems map to
/// [`HealthState::Unreachable`].
pub async fn check_health<S>(source: &S) -> HealthState
where
    S: HealthSource + ?Sized,
{
    match source.fetch_health().await {
        Ok(report) if report.is_ok() => HealthState::Healthy,
        Ok(report) => {
            debug!(status = %report.status, "backend reported unhealthy status");
            HealthState::Unhealthy
        }
        Err(e) => {
            warn!(error = %e, "health check failed");
            HealthState::Unreachable
        }
    }
}

/// Background task that checks health immediately and then every `interval`,
/// feeding each result to a sink.
#[derive(Debug)]
pub struct HealthPinger {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl HealthPinger {
    /// Spawn the pinger on the current tokio runtime.
    ///
    /// Panics if `interval` is zero.
    pub fn spawn<S, F>(source: S, interval: Duration, mut sink: F) -> Self
    where
        S: HealthSource + 'static,
        F: FnMut(HealthState) + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A slow check delays the next tick instead of bursting.
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let state = tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    state = check_health(&source) => state,
                };
                sink(state);
            }
            debug!("health pinger stopped");
        });

        Self {
            token,
            join: Some(join),
        }
    }

    /// Stop pinging. No further checks are started after this returns.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop pinging and wait for the background task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!(error = %e, "health pinger task ended abnormally");
            }
        }
    }
}

impl Drop for HealthPinger {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
