//! Scheduler backed by browser timers.

use crate::core::schedule::Scheduler;
use futures_util::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use js_sys::Date;

/// `setTimeout` sleeps and `spawn_local` tasks on the page event loop.
pub(crate) struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        Date::now()
    }

    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(ms))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
