//! Page-level wiring: one [`Dashboard`] per loaded page.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use testdeck_client::{
    CancellationToken, ClientConfig, HealthPinger, HealthSource, HealthState, PollCallbacks,
    PollHandle, StatusPoller, StatusSource, check_health,
};
use tracing::{debug, info};

use crate::health::render_health;
use crate::init::{PageInit, init_page};
use crate::page::Document;
use crate::states;
use crate::toast::{ToastKind, Toaster};

/// Shared handle to the page a dashboard renders into.
pub type SharedPage<D> = Arc<Mutex<D>>;

/// Stateful helpers bound to one page and one backend.
///
/// [`Dashboard::start`] activates tooltips and popovers and starts the
/// periodic health check. Polling sessions started through
/// [`Dashboard::poll_task`] are cancelled by [`Dashboard::shutdown`].
pub struct Dashboard<D, S> {
    page: SharedPage<D>,
    source: Arc<S>,
    poller: StatusPoller<S>,
    toaster: Mutex<Toaster>,
    root: CancellationToken,
    pinger: Option<HealthPinger>,
    init: PageInit,
}

impl<D, S> std::fmt::Debug for Dashboard<D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("init", &self.init)
            .field("pinging", &self.pinger.is_some())
            .field("stopped", &self.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

fn lock<D>(page: &Mutex<D>) -> MutexGuard<'_, D> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<D, S> Dashboard<D, S>
where
    D: Document + Send + 'static,
    S: StatusSource + HealthSource + 'static,
{
    /// Initialise `page` and start the health pinger. Must be called from
    /// within a tokio runtime.
    pub fn start(page: SharedPage<D>, source: Arc<S>, config: &ClientConfig) -> Self {
        let init = init_page(&mut *lock(&page));
        debug!(tooltips = init.tooltips, popovers = init.popovers, "page initialised");

        let pinger = if config.health_interval.is_zero() {
            debug!("health interval is zero, periodic health check disabled");
            None
        } else {
            let sink_page = Arc::clone(&page);
            Some(HealthPinger::spawn(
                Arc::clone(&source),
                config.health_interval,
                move |state| {
                    render_health(&mut *lock(&sink_page), state);
                },
            ))
        };

        info!(api_base = %config.api_base, "dashboard started");

        Self {
            poller: StatusPoller::from_arc(Arc::clone(&source), config.poll_settings()),
            page,
            source,
            toaster: Mutex::new(Toaster::new()),
            root: CancellationToken::new(),
            pinger,
            init,
        }
    }

    pub fn page(&self) -> &SharedPage<D> {
        &self.page
    }

    /// What [`init_page`] activated at start.
    pub fn page_init(&self) -> PageInit {
        self.init
    }

    pub fn show_toast(&self, message: &str, kind: ToastKind) -> String {
        let mut page = lock(&self.page);
        lock(&self.toaster).show(&mut *page, message, kind)
    }

    /// Remove toasts whose lifetime has elapsed by `now`.
    pub fn sweep_toasts(&self, now: Instant) -> usize {
        let mut page = lock(&self.page);
        lock(&self.toaster).sweep(&mut *page, now)
    }

    pub fn show_loading(&self, id: &str) -> bool {
        states::show_loading(&mut *lock(&self.page), id)
    }

    pub fn show_empty_state(&self, id: &str, message: &str, icon: Option<&str>) -> bool {
        states::show_empty_state(&mut *lock(&self.page), id, message, icon)
    }

    pub fn show_error(&self, id: &str, message: &str) -> bool {
        states::show_error(&mut *lock(&self.page), id, message)
    }

    /// Poll `task_id` until it ends. The session is also cancelled when the
    /// dashboard shuts down.
    pub fn poll_task(&self, task_id: impl Into<String>, callbacks: PollCallbacks) -> PollHandle {
        self.poller
            .poll_with_token(task_id, callbacks, self.root.child_token())
    }

    /// Check health once and render the result.
    pub async fn check_health(&self) -> HealthState {
        let state = check_health(&*self.source).await;
        render_health(&mut *lock(&self.page), state);
        state
    }

    /// Stop the health pinger and cancel every session from [`poll_task`](Self::poll_task).
    pub async fn shutdown(self) {
        self.root.cancel();
        if let Some(pinger) = self.pinger {
            pinger.shutdown().await;
        }
        debug!("dashboard stopped");
    }
}
