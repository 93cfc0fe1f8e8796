//! Timer and task seam between the engine and the host event loop.
//!
//! # Design
//! - The browser build backs this with gloo timers and `spawn_local`.
//! - Tests back it with a paused tokio clock so timing assertions are exact.

use futures_util::future::LocalBoxFuture;
use std::rc::Rc;

/// Single-threaded scheduler used by every timed component.
pub trait Scheduler {
    /// Milliseconds on a monotonic clock.
    fn now_ms(&self) -> f64;

    /// Resolve after `ms` milliseconds.
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;

    /// Run `task` to completion on the local event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Shared scheduler handle.
pub type SharedScheduler = Rc<dyn Scheduler>;
