//! Task status polling.
//!
//! A polling session fetches a task's status immediately, then once per
//! [`PollSettings::interval`] until one of three things happens:
//!
//! 1. the backend reports a terminal status (`completed`, `failed`,
//!    `timeout`, `error`): that snapshot completes the session;
//! 2. [`PollSettings::max_attempts`] non-terminal responses have been seen:
//!    the session completes with [`TaskSnapshot::timed_out`];
//! 3. a fetch fails or exceeds [`PollSettings::request_timeout`]: the session
//!    completes with [`TaskSnapshot::transport_error`]. Failures are not retried.
//!
//! Each fetch is issued only after the previous one resolved, so one session
//! observes snapshots strictly in order. Sessions share nothing.
//!
//! A session can also be cancelled through its [`PollHandle`]. Cancellation
//! is checked before every fetch and before every callback, and interrupts
//! both an in-flight fetch and the inter-attempt sleep. A cancelled session
//! never calls `on_complete`.
//!
//! A panicking `on_update` ends the session like a failed fetch: `on_complete`
//! receives an `error` snapshot carrying the panic message.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::ClientError;
use crate::snapshot::TaskSnapshot;
use crate::transport::StatusSource;

/// Timing and budget of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between the resolution of one fetch and the issue of the next.
    pub interval: Duration,
    /// Non-terminal responses tolerated before giving up.
    pub max_attempts: u32,
    /// Deadline for a single fetch.
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub type UpdateFn = Box<dyn FnMut(&TaskSnapshot) + Send>;
pub type CompleteFn = Box<dyn FnOnce(TaskSnapshot) + Send>;

/// Optional observers of a polling session.
#[derive(Default)]
pub struct PollCallbacks {
    on_update: Option<UpdateFn>,
    on_complete: Option<CompleteFn>,
}

impl PollCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every fetched snapshot, terminal or not, in fetch order.
    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TaskSnapshot) + Send + 'static,
    {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Called exactly once with the final snapshot, unless the session is
    /// cancelled.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(TaskSnapshot) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for PollCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollCallbacks")
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// How a polling session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The session reached a terminal snapshot (real or synthesised).
    Finished(TaskSnapshot),
    /// The session was cancelled before finishing.
    Cancelled,
}

impl PollOutcome {
    pub fn snapshot(&self) -> Option<&TaskSnapshot> {
        match self {
            PollOutcome::Finished(s) => Some(s),
            PollOutcome::Cancelled => None,
        }
    }

    pub fn into_snapshot(self) -> Option<TaskSnapshot> {
        match self {
            PollOutcome::Finished(s) => Some(s),
            PollOutcome::Cancelled => None,
        }
    }
}

/// Handle to a spawned polling session.
///
/// Dropping the handle detaches the session; it keeps running until it
/// finishes on its own.
#[derive(Debug)]
pub struct PollHandle {
    task_id: String,
    token: CancellationToken,
    join: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Stop the session. No callback is invoked once this returns.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A clone of the session's token, e.g. to tie it to a UI component.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the session to end.
    pub async fn wait(self) -> PollOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(task_id = %self.task_id, error = %e, "polling session ended abnormally");
                PollOutcome::Finished(TaskSnapshot::transport_error(format!(
                    "polling session ended abnormally: {e}"
                )))
            }
        }
    }
}

/// Polls task status through a [`StatusSource`].
pub struct StatusPoller<S: ?Sized> {
    source: Arc<S>,
    settings: PollSettings,
}

impl<S: ?Sized> Clone for StatusPoller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            settings: self.settings,
        }
    }
}

impl<S: ?Sized> fmt::Debug for StatusPoller<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusPoller")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S> StatusPoller<S>
where
    S: StatusSource + 'static,
{
    pub fn new(source: S, settings: PollSettings) -> Self {
        Self::from_arc(Arc::new(source), settings)
    }
}

impl<S> StatusPoller<S>
where
    S: StatusSource + ?Sized + 'static,
{
    pub fn from_arc(source: Arc<S>, settings: PollSettings) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Start an independent polling session on the current tokio runtime.
    pub fn poll(&self, task_id: impl Into<String>, callbacks: PollCallbacks) -> PollHandle {
        self.poll_with_token(task_id, callbacks, CancellationToken::new())
    }

    /// Like [`poll`](Self::poll), but cancelled through `token`. Pass a
    /// `parent.child_token()` to stop the session together with its owner.
    pub fn poll_with_token(
        &self,
        task_id: impl Into<String>,
        callbacks: PollCallbacks,
        token: CancellationToken,
    ) -> PollHandle {
        let task_id = task_id.into();
        let poller = self.clone();
        let session_id = task_id.clone();
        let session_token = token.clone();
        let span = info_span!("poll_task", task_id = %task_id);

        let join = tokio::spawn(
            async move { poller.run(&session_id, callbacks, &session_token).await }
                .instrument(span),
        );

        PollHandle {
            task_id,
            token,
            join,
        }
    }

    /// Drive one polling session to its end on the calling task.
    pub async fn run(
        &self,
        task_id: &str,
        callbacks: PollCallbacks,
        token: &CancellationToken,
    ) -> PollOutcome {
        let PollCallbacks {
            mut on_update,
            on_complete,
        } = callbacks;
        let mut attempts: u32 = 0;

        loop {
            if token.is_cancelled() {
                debug!(task_id, attempts, "polling cancelled");
                return PollOutcome::Cancelled;
            }

            debug!(task_id, attempt = attempts + 1, "fetching task status");
            let fetched = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(task_id, attempts, "polling cancelled during fetch");
                    return PollOutcome::Cancelled;
                }
                r = tokio::time::timeout(
                    self.settings.request_timeout,
                    self.source.fetch_status(task_id),
                ) => r.unwrap_or(Err(ClientError::Timeout(self.settings.request_timeout))),
            };

            let snapshot = match fetched {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(task_id, attempts, error = %e, "task status fetch failed");
                    return complete(
                        token,
                        on_complete,
                        TaskSnapshot::transport_error(e.to_string()),
                    );
                }
            };

            if token.is_cancelled() {
                return PollOutcome::Cancelled;
            }
            if let Some(cb) = on_update.as_mut() {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| cb(&snapshot))) {
                    let reason = panic_message(payload.as_ref());
                    warn!(task_id, attempts, reason, "on_update callback panicked");
                    return complete(
                        token,
                        on_complete,
                        TaskSnapshot::transport_error(format!("update callback panicked: {reason}")),
                    );
                }
            }

            if snapshot.is_terminal() {
                info!(task_id, status = %snapshot.status, attempts, "task reached terminal status");
                return complete(token, on_complete, snapshot);
            }

            attempts += 1;
            if attempts >= self.settings.max_attempts {
                warn!(task_id, attempts, "task did not finish within the polling budget");
                return complete(token, on_complete, TaskSnapshot::timed_out());
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(task_id, attempts, "polling cancelled while waiting");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn complete(
    token: &CancellationToken,
    on_complete: Option<CompleteFn>,
    snapshot: TaskSnapshot,
) -> PollOutcome {
    if token.is_cancelled() {
        return PollOutcome::Cancelled;
    }
    if let Some(cb) = on_complete {
        cb(snapshot.clone());
    }
    PollOutcome::Finished(snapshot)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
