//! Periodic refresh of a single widget instance.
//!
//! Each fetch cycle owns a child of the scheduler's stop token. Starting a new
//! cycle cancels the previous one, and `stop()` cancels all of them; a cycle's
//! result is only applied if its token is still live at the moment of the
//! state update. The underlying request is never aborted, its result is just
//! dropped on arrival.

use parking_lot::Mutex;
use serde::Serialize;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{sync::watch, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorInfo, FetchError},
    model::ForecastView,
    source::ForecastSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPhase {
    /// Nothing fetched yet.
    Idle,
    Loading,
    /// Last cycle succeeded.
    Success,
    /// Last cycle failed; any earlier view is kept.
    Failed,
}

/// What a host UI renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetState {
    pub phase: RefreshPhase,
    pub view: Option<ForecastView>,
    pub error: Option<ErrorInfo>,
}

impl WidgetState {
    pub fn loading(&self) -> bool {
        self.phase == RefreshPhase::Loading
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self { phase: RefreshPhase::Idle, view: None, error: None }
    }
}

struct Inner {
    source: Arc<dyn ForecastSource>,
    state: watch::Sender<WidgetState>,
    stop: CancellationToken,
    cycle: Mutex<CancellationToken>,
}

impl Inner {
    /// Supersede any in-flight cycle and fetch again.
    fn begin_cycle(self: &Arc<Self>) {
        let mut started = None;

        self.state.send_if_modified(|state| {
            if self.stop.is_cancelled() {
                return false;
            }
            let token = self.stop.child_token();
            let previous = std::mem::replace(&mut *self.cycle.lock(), token.clone());
            previous.cancel();

            state.phase = RefreshPhase::Loading;
            started = Some(token);
            true
        });

        let Some(token) = started else {
            debug!("Scheduler stopped, refresh ignored");
            return;
        };

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.source.fetch_forecast().await;
            inner.finish_cycle(&token, result);
        });
    }

    fn finish_cycle(&self, token: &CancellationToken, result: Result<ForecastView, FetchError>) {
        self.state.send_if_modified(|state| {
            if token.is_cancelled() {
                debug!("Discarding result of a superseded or stopped refresh");
                return false;
            }

            match result {
                Ok(view) => {
                    info!(location = %view.timezone_label, "Forecast refreshed");
                    state.view = Some(view);
                    state.error = None;
                    state.phase = RefreshPhase::Success;
                }
                Err(err) => {
                    warn!(error = %err, "Forecast refresh failed");
                    state.error = Some(ErrorInfo::now(err));
                    state.phase = RefreshPhase::Failed;
                }
            }
            true
        });
    }

    fn stop(&self) {
        // Cancel under the state lock so no update can land after we return.
        self.state.send_if_modified(|_| {
            self.stop.cancel();
            false
        });
    }
}

/// Fetches immediately on `start()`, then every `interval`.
///
/// All methods that trigger a fetch spawn onto the current Tokio runtime and
/// panic if called outside one. Dropping the scheduler stops it.
pub struct RefreshScheduler {
    inner: Arc<Inner>,
    interval: Duration,
    started: AtomicBool,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("source", &self.inner.source)
            .field("interval", &self.interval)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl RefreshScheduler {
    pub fn new(source: Arc<dyn ForecastSource>, interval: Duration) -> Self {
        let (state, _) = watch::channel(WidgetState::default());
        let stop = CancellationToken::new();
        let cycle = Mutex::new(stop.child_token());

        Self {
            inner: Arc::new(Inner { source, state, stop, cycle }),
            interval,
            started: AtomicBool::new(false),
        }
    }

    /// Start the refresh timer. The first tick fires right away. Calling this
    /// twice, or after `stop()`, does nothing.
    pub fn start(&self) {
        if self.is_stopped() || self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let period = self.interval;
        info!(interval_secs = period.as_secs(), "Starting forecast refresh timer");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = inner.stop.cancelled() => break,
                    _ = ticker.tick() => inner.begin_cycle(),
                }
            }
            debug!("Forecast refresh timer stopped");
        });
    }

    /// Fetch now, independent of the timer. Supersedes an in-flight fetch.
    pub fn refresh_now(&self) {
        self.inner.begin_cycle();
    }

    /// Clear the timer and ignore any result still in flight.
    pub fn stop(&self) {
        if !self.is_stopped() {
            info!("Stopping forecast refresh");
        }
        self.inner.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stop.is_cancelled()
    }

    pub fn state(&self) -> WidgetState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.inner.state.subscribe()
    }

    pub fn view(&self) -> Option<ForecastView> {
        self.inner.state.borrow().view.clone()
    }

    pub fn error(&self) -> Option<ErrorInfo> {
        self.inner.state.borrow().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.inner.stop();
    }
}
