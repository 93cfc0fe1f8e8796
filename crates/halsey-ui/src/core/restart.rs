//! Restart coordination and the global input block.
//!
//! # Design
//! - The input block is the only cross-component mutable state; a session holds it through a guard.
//! - The guard releases on drop, so every early return unblocks; only the reload path retains it.
//! - Polling failures are expected while the process is down and simply wait for the next tick.
//! - Elapsed time is measured from the moment the restart was requested; every wait races the deadline.

use crate::core::config::Timings;
use crate::core::error::FieldError;
use crate::core::schedule::SharedScheduler;
use crate::core::transport::{ChangeRequest, Method, TransportOutcome};
use async_trait::async_trait;
use futures_util::future::{Either, select};
use halsey_api_models::{RestartRequest, RestartStatus, SETTINGS_PREFIX};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Alert shown when polling gives up.
pub const TIMEOUT_MESSAGE: &str = "Restart timed out. Please check logs or try again.";
/// Alert shown when the server came back without applying a requested update.
pub const MISMATCH_MESSAGE: &str = "Restart completed, but the update did not apply. You may already be on the latest version, or the update failed.";
/// Message used when the restart request itself is refused.
pub const REJECTED_MESSAGE: &str = "Failed to restart server";

type BlockObserver = Rc<dyn Fn(bool)>;

#[derive(Default)]
struct BlockInner {
    held: Cell<bool>,
    observers: RefCell<Vec<BlockObserver>>,
}

/// Page-wide interaction block.
#[derive(Clone, Default)]
pub struct InputBlock {
    inner: Rc<BlockInner>,
}

impl InputBlock {
    /// Unblocked page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether interaction is currently blocked.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.inner.held.get()
    }

    /// Notify `observer` on every change of the held flag.
    pub fn subscribe(&self, observer: impl Fn(bool) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Take the block, or `None` when someone else already holds it.
    #[must_use]
    pub fn acquire(&self) -> Option<BlockGuard> {
        if self.is_held() {
            return None;
        }
        self.set(true);
        Some(BlockGuard {
            block: self.clone(),
            armed: true,
        })
    }

    fn set(&self, held: bool) {
        self.inner.held.set(held);
        let observers: Vec<BlockObserver> = self.inner.observers.borrow().clone();
        for observer in observers {
            observer(held);
        }
    }
}

/// Scoped ownership of the [`InputBlock`].
#[must_use]
pub struct BlockGuard {
    block: InputBlock,
    armed: bool,
}

impl BlockGuard {
    /// Keep the page blocked after the guard goes away (the page is being replaced).
    pub fn retain(mut self) {
        self.armed = false;
    }
}

impl Drop for BlockGuard {
    fn drop(&mut self) {
        if self.armed {
            self.block.set(false);
        }
    }
}

/// Where a restart session currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPhase {
    /// No session.
    #[default]
    Idle,
    /// Restart requested, waiting for acceptance and the grace period.
    Restarting,
    /// Polling the status endpoint.
    Polling,
    /// Server is back; the page reloads.
    Reloading,
    /// Server is back but the requested update was not applied.
    Mismatched,
    /// Gave up waiting.
    TimedOut,
}

/// Terminal result of [`RestartCoordinator::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Reload the page; the input block stays held.
    Reload,
    /// Restarted without the requested update.
    Mismatch,
    /// No terminal status before the deadline.
    TimedOut,
    /// The restart request was refused.
    Rejected(String),
    /// Another session already holds the input block.
    Busy,
}

impl RestartOutcome {
    /// Alert text for outcomes that leave the user on the page.
    #[must_use]
    pub fn alert(&self) -> Option<String> {
        match self {
            Self::Reload | Self::Busy => None,
            Self::Mismatch => Some(MISMATCH_MESSAGE.to_string()),
            Self::TimedOut => Some(TIMEOUT_MESSAGE.to_string()),
            Self::Rejected(message) => Some(format!("Error: {message}")),
        }
    }
}

/// `POST /settings/restart` carrying `request` as its JSON body.
///
/// # Errors
/// Returns [`FieldError::Validation`] if the body cannot be encoded.
pub fn restart_change(request: RestartRequest) -> Result<ChangeRequest, FieldError> {
    let body = serde_json::to_value(request).map_err(|err| FieldError::Validation(err.to_string()))?;
    let mut change = ChangeRequest::action(Method::Post, format!("{SETTINGS_PREFIX}/restart"));
    change.body = Some(body);
    Ok(change)
}

/// Restart endpoints.
#[async_trait(?Send)]
pub trait RestartApi {
    /// `POST /settings/restart`.
    async fn request_restart(&self, request: RestartRequest) -> TransportOutcome;

    /// `GET /settings/restart-status?t={cache_bust}`.
    async fn restart_status(&self, cache_bust: u64) -> Result<RestartStatus, String>;
}

/// Drives one restart session at a time.
#[derive(Clone)]
pub struct RestartCoordinator {
    api: Rc<dyn RestartApi>,
    scheduler: SharedScheduler,
    block: InputBlock,
    timings: Timings,
    phase: Rc<Cell<RestartPhase>>,
    on_phase: Option<Rc<dyn Fn(RestartPhase)>>,
}

impl RestartCoordinator {
    /// Coordinator sharing `block` with the rest of the page.
    #[must_use]
    pub fn new(
        api: Rc<dyn RestartApi>,
        scheduler: SharedScheduler,
        block: InputBlock,
        timings: Timings,
    ) -> Self {
        Self {
            api,
            scheduler,
            block,
            timings,
            phase: Rc::new(Cell::new(RestartPhase::Idle)),
            on_phase: None,
        }
    }

    /// Report every phase change to `observer`.
    #[must_use]
    pub fn with_phase_observer(mut self, observer: impl Fn(RestartPhase) + 'static) -> Self {
        self.on_phase = Some(Rc::new(observer));
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RestartPhase {
        self.phase.get()
    }

    /// Run a full session: request, grace period, then poll to a terminal state.
    pub async fn run(&self, request: RestartRequest) -> RestartOutcome {
        let Some(guard) = self.block.acquire() else {
            debug!("restart ignored; input already blocked");
            return RestartOutcome::Busy;
        };
        let started = self.scheduler.now_ms();
        self.enter(RestartPhase::Restarting);

        if let Err(err) = self.api.request_restart(request).await.into_result() {
            let message = match err {
                FieldError::Network(reason) => reason,
                _ => REJECTED_MESSAGE.to_string(),
            };
            warn!(error = %message, "restart request refused");
            self.enter(RestartPhase::Idle);
            drop(guard);
            return RestartOutcome::Rejected(message);
        }

        let deadline = started + f64::from(self.timings.restart_timeout_ms);
        let grace = self.scheduler.sleep(self.timings.restart_grace_ms);
        if self.before_deadline(deadline, grace).await.is_none() {
            return self.time_out(guard, 0);
        }
        self.enter(RestartPhase::Polling);

        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            debug!(attempt, update = request.update, "polling restart status");
            let poll = self.api.restart_status(cache_bust(self.scheduler.now_ms()));
            let Some(polled) = self.before_deadline(deadline, poll).await else {
                return self.time_out(guard, attempt);
            };
            match polled {
                Ok(status) if status.restarted => {
                    if status.honours(request.update) {
                        self.enter(RestartPhase::Reloading);
                        guard.retain();
                        return RestartOutcome::Reload;
                    }
                    warn!(?status, "restart finished without the requested update");
                    self.enter(RestartPhase::Mismatched);
                    drop(guard);
                    return RestartOutcome::Mismatch;
                }
                Ok(_) => debug!(attempt, "server not restarted yet"),
                Err(reason) => debug!(attempt, error = %reason, "restart poll failed"),
            }
            let interval = self.scheduler.sleep(self.timings.restart_poll_interval_ms);
            if self.before_deadline(deadline, interval).await.is_none() {
                return self.time_out(guard, attempt);
            }
        }
    }

    /// Resolve `work`, or `None` once the clock reaches `deadline`.
    async fn before_deadline<T>(&self, deadline: f64, work: impl Future<Output = T>) -> Option<T> {
        let remaining = deadline - self.scheduler.now_ms();
        if remaining <= 0.0 {
            return None;
        }
        let timer = self.scheduler.sleep(whole_ms(remaining));
        let work = pin!(work);
        match select(work, timer).await {
            Either::Left((value, _)) => Some(value),
            Either::Right(((), _)) => None,
        }
    }

    fn time_out(&self, guard: BlockGuard, attempt: u32) -> RestartOutcome {
        warn!(attempt, "restart timed out");
        self.enter(RestartPhase::TimedOut);
        drop(guard);
        RestartOutcome::TimedOut
    }

    fn enter(&self, phase: RestartPhase) {
        info!(?phase, "restart phase");
        self.phase.set(phase);
        if let Some(observer) = &self.on_phase {
            observer(phase);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cache_bust(now_ms: f64) -> u64 {
    now_ms.max(0.0) as u64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_ms(ms: f64) -> u32 {
    ms.ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}
