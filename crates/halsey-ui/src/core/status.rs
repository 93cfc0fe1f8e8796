//! Per-field status indicator state machine.
//!
//! # Design
//! - State transitions are owned here; rendering goes through [`StatusView`].
//! - `Success` decays to `Idle` after a delay unless another transition happened first.
//! - Every transition bumps an epoch; the decay task reverts only if the epoch it captured is still current.

use crate::core::schedule::SharedScheduler;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Visible state of one field's indicator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusState {
    /// Nothing to show.
    #[default]
    Idle,
    /// A write is in flight.
    Pending,
    /// Last write succeeded (transient).
    Success,
    /// Last write failed with a message.
    Error(String),
}

impl StatusState {
    /// Every CSS modifier, indexed by state.
    pub const MODIFIERS: [&'static str; 4] = [
        "status-idle",
        "status-pending",
        "status-success",
        "status-error",
    ];

    /// CSS modifier used by the browser view.
    #[must_use]
    pub const fn modifier(&self) -> &'static str {
        let idx = match self {
            Self::Idle => 0,
            Self::Pending => 1,
            Self::Success => 2,
            Self::Error(_) => 3,
        };
        Self::MODIFIERS[idx]
    }

    /// Errors are clickable so the message can be revealed.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Presentation sink for indicator transitions.
pub trait StatusView {
    /// Reflect `state` on screen.
    fn render(&self, state: &StatusState);
}

struct Inner {
    state: RefCell<StatusState>,
    epoch: Cell<u64>,
    decay_ms: u32,
    view: Box<dyn StatusView>,
    scheduler: SharedScheduler,
}

/// Status indicator for one binding.
#[derive(Clone)]
pub struct StatusIndicator {
    inner: Rc<Inner>,
}

impl StatusIndicator {
    /// Build an idle indicator that renders through `view`.
    #[must_use]
    pub fn new(view: impl StatusView + 'static, scheduler: SharedScheduler, decay_ms: u32) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(StatusState::Idle),
                epoch: Cell::new(0),
                decay_ms,
                view: Box::new(view),
                scheduler,
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StatusState {
        self.inner.state.borrow().clone()
    }

    /// Message of the last error while the indicator is in the error state.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        match &*self.inner.state.borrow() {
            StatusState::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Show the in-flight state.
    pub fn set_pending(&self) {
        self.transition(StatusState::Pending);
    }

    /// Show success and schedule the decay back to idle.
    pub fn set_success(&self) {
        let epoch = self.transition(StatusState::Success);
        let indicator = self.clone();
        let sleep = self.inner.scheduler.sleep(self.inner.decay_ms);
        self.inner.scheduler.spawn(Box::pin(async move {
            sleep.await;
            indicator.decay(epoch);
        }));
    }

    /// Show an error and keep its message for later retrieval.
    pub fn set_error(&self, message: impl Into<String>) {
        self.transition(StatusState::Error(message.into()));
    }

    /// Return to idle.
    pub fn clear(&self) {
        self.transition(StatusState::Idle);
    }

    fn decay(&self, epoch: u64) {
        let still_success = self.inner.epoch.get() == epoch
            && *self.inner.state.borrow() == StatusState::Success;
        if still_success {
            self.transition(StatusState::Idle);
        }
    }

    fn transition(&self, next: StatusState) -> u64 {
        let epoch = self.inner.epoch.get().wrapping_add(1);
        self.inner.epoch.set(epoch);
        self.inner.view.render(&next);
        *self.inner.state.borrow_mut() = next;
        epoch
    }
}
