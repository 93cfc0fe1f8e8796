//! Test doubles shared by the engine tests.

use crate::core::generation::Ticket;
use crate::core::schedule::{Scheduler, SharedScheduler};
use crate::core::status::{StatusState, StatusView};
use crate::core::transport::{ChangeRequest, Transport, TransportOutcome};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

/// Scheduler on the tokio clock; pair with `start_paused = true`.
pub(crate) struct TokioScheduler {
    origin: Instant,
}

impl TokioScheduler {
    pub(crate) fn shared() -> SharedScheduler {
        Rc::new(Self {
            origin: Instant::now(),
        })
    }
}

impl Scheduler for TokioScheduler {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(Duration::from_millis(u64::from(ms))))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        drop(tokio::task::spawn_local(task));
    }
}

/// Run `fut` inside a `LocalSet` so `spawn_local` works.
pub(crate) async fn run_local<F: Future>(fut: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(fut).await
}

/// Milliseconds since the paused clock started, rounded down.
pub(crate) fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// View that records every rendered state.
#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    states: Rc<RefCell<Vec<StatusState>>>,
}

impl RecordingView {
    pub(crate) fn states(&self) -> Vec<StatusState> {
        self.states.borrow().clone()
    }
}

impl StatusView for RecordingView {
    fn render(&self, state: &StatusState) {
        self.states.borrow_mut().push(state.clone());
    }
}

/// Reply the scripted transport plays for one request.
pub(crate) struct Scripted {
    delay_ms: u64,
    outcome: TransportOutcome,
}

impl Scripted {
    pub(crate) fn now(outcome: TransportOutcome) -> Self {
        Self::after(0, outcome)
    }

    pub(crate) fn after(delay_ms: u64, outcome: TransportOutcome) -> Self {
        Self { delay_ms, outcome }
    }
}

/// A request as seen by the fake, with its send time.
#[derive(Clone, Debug)]
pub(crate) struct SentRequest {
    pub(crate) request: ChangeRequest,
    pub(crate) at_ms: u64,
}

struct ScriptState {
    origin: Instant,
    replies: RefCell<VecDeque<Scripted>>,
    sent: RefCell<Vec<SentRequest>>,
    aborted: Cell<usize>,
}

/// Transport that replays queued outcomes; unscripted requests succeed at once.
#[derive(Clone)]
pub(crate) struct ScriptedTransport {
    state: Rc<ScriptState>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self {
            state: Rc::new(ScriptState {
                origin: Instant::now(),
                replies: RefCell::new(VecDeque::new()),
                sent: RefCell::new(Vec::new()),
                aborted: Cell::new(0),
            }),
        }
    }
}

impl ScriptedTransport {
    pub(crate) fn push(&self, reply: Scripted) {
        self.state.replies.borrow_mut().push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<SentRequest> {
        self.state.sent.borrow().clone()
    }

    /// Requests torn down through their ticket while still in flight.
    pub(crate) fn aborted(&self) -> usize {
        self.state.aborted.get()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ChangeRequest, signal: Ticket) -> TransportOutcome {
        self.state.sent.borrow_mut().push(SentRequest {
            request,
            at_ms: elapsed_ms(self.state.origin),
        });
        let reply = self
            .state
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Scripted::now(TransportOutcome::Ok));

        let in_flight = Rc::new(Cell::new(true));
        let torn_down = Rc::new(Cell::new(false));
        {
            let in_flight = in_flight.clone();
            let torn_down = torn_down.clone();
            let state = self.state.clone();
            signal.on_cancel(move || {
                if in_flight.get() {
                    torn_down.set(true);
                    state.aborted.set(state.aborted.get() + 1);
                }
            });
        }
        if reply.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(reply.delay_ms)).await;
        }
        in_flight.set(false);
        if torn_down.get() {
            return TransportOutcome::Cancelled;
        }
        reply.outcome
    }
}
