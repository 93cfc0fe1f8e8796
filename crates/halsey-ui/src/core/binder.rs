//! Field synchronization engine.
//!
//! # Design
//! - One binder per bound control; it owns that control's generation counter.
//! - Immediate controls write on every change; text controls debounce first.
//! - A completion applies its effect only while its ticket is current, so the
//!   indicator always reflects the most recently issued request.
//! - No automatic retries: the user re-triggers by editing again.

use crate::core::binding::{ControlValue, Feedback, FieldBinding};
use crate::core::error::FieldError;
use crate::core::generation::{Generation, Ticket};
use crate::core::schedule::SharedScheduler;
use crate::core::status::StatusIndicator;
use crate::core::transport::{ChangeRequest, Transport};
use serde_json::Value;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, warn};

/// What happened to one edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The server accepted the write.
    Applied,
    /// Blank input on a skip-empty binding; nothing was sent.
    Skipped,
    /// A newer edit took over; nothing was rendered.
    Superseded,
    /// The write failed locally or remotely.
    Failed(FieldError),
}

/// Collaborators shared by every binder on the page.
#[derive(Clone)]
pub struct BinderDeps {
    /// Network seam.
    pub transport: Rc<dyn Transport>,
    /// Timer seam.
    pub scheduler: SharedScheduler,
    /// Debounce applied when a binding has no override.
    pub default_debounce_ms: u32,
}

struct Inner {
    binding: FieldBinding,
    deps: BinderDeps,
    indicator: StatusIndicator,
    generation: Generation,
    on_success: Option<Rc<dyn Fn()>>,
}

/// Live wiring of one [`FieldBinding`].
#[derive(Clone)]
pub struct FieldBinder {
    inner: Rc<Inner>,
}

impl FieldBinder {
    /// Wire `binding` to its indicator.
    #[must_use]
    pub fn new(binding: FieldBinding, deps: BinderDeps, indicator: StatusIndicator) -> Self {
        Self::build(binding, deps, indicator, None)
    }

    /// Wire `binding` and run `hook` after every genuine success.
    #[must_use]
    pub fn with_success_hook(
        binding: FieldBinding,
        deps: BinderDeps,
        indicator: StatusIndicator,
        hook: Rc<dyn Fn()>,
    ) -> Self {
        Self::build(binding, deps, indicator, Some(hook))
    }

    fn build(
        binding: FieldBinding,
        deps: BinderDeps,
        indicator: StatusIndicator,
        on_success: Option<Rc<dyn Fn()>>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                binding,
                deps,
                indicator,
                generation: Generation::new(),
                on_success,
            }),
        }
    }

    /// Bound descriptor.
    #[must_use]
    pub fn binding(&self) -> &FieldBinding {
        &self.inner.binding
    }

    /// Indicator driven by this binder.
    #[must_use]
    pub fn indicator(&self) -> &StatusIndicator {
        &self.inner.indicator
    }

    /// Handle one change/input event. The returned future owns everything it needs.
    pub fn on_event(&self, value: ControlValue) -> impl Future<Output = CommitOutcome> + 'static {
        let binder = self.clone();
        async move {
            if binder.inner.binding.kind.is_debounced() {
                binder.debounced(value).await
            } else {
                binder.immediate(value).await
            }
        }
    }

    async fn immediate(&self, value: ControlValue) -> CommitOutcome {
        let ticket = self.inner.generation.advance();
        match self.inner.binding.coerce(value) {
            Ok(json) => self.send(ticket, json).await,
            Err(err) => self.fail(err),
        }
    }

    async fn debounced(&self, value: ControlValue) -> CommitOutcome {
        let ticket = self.inner.generation.supersede();
        let delay = self
            .inner
            .binding
            .debounce_ms(self.inner.deps.default_debounce_ms);
        self.inner.deps.scheduler.sleep(delay).await;
        if ticket.is_cancelled() {
            return CommitOutcome::Superseded;
        }
        if self.inner.binding.options.skip_empty && value.is_blank() {
            debug!(control = %self.inner.binding.control, "blank input skipped");
            return CommitOutcome::Skipped;
        }
        match self.inner.binding.coerce(value) {
            Ok(json) => self.send(ticket, json).await,
            Err(err) => self.fail(err),
        }
    }

    async fn send(&self, ticket: Ticket, value: Value) -> CommitOutcome {
        let binding = &self.inner.binding;
        if self.reports_to_indicator() {
            self.inner.indicator.set_pending();
        }
        let request = ChangeRequest::post(&binding.endpoint, binding.path.body(value));
        debug!(
            control = %binding.control,
            endpoint = %binding.endpoint,
            field = %binding.path,
            "sending field update"
        );
        let outcome = self.inner.deps.transport.send(request, ticket.clone()).await;
        if ticket.is_cancelled() {
            return CommitOutcome::Superseded;
        }
        match outcome.into_result() {
            Ok(()) => {
                if self.reports_to_indicator() {
                    self.inner.indicator.set_success();
                }
                if let Some(hook) = &self.inner.on_success {
                    hook();
                }
                CommitOutcome::Applied
            }
            Err(FieldError::Cancelled) => CommitOutcome::Superseded,
            Err(err) => self.fail(err),
        }
    }

    fn fail(&self, err: FieldError) -> CommitOutcome {
        let binding = &self.inner.binding;
        if self.reports_to_indicator() {
            self.inner.indicator.set_error(err.to_string());
        }
        warn!(
            control = %binding.control,
            endpoint = %binding.endpoint,
            error = %err,
            "field update failed"
        );
        CommitOutcome::Failed(err)
    }

    fn reports_to_indicator(&self) -> bool {
        self.inner.binding.options.feedback == Feedback::Indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binding::{BindingOptions, ControlKind, SuccessEffect};
    use crate::core::status::StatusState;
    use crate::core::testing::{
        RecordingView, Scripted, ScriptedTransport, TokioScheduler, run_local,
    };
    use crate::core::transport::{Endpoint, TransportOutcome};
    use serde_json::json;
    use std::cell::Cell;
    use std::time::Duration;
    use tokio::task::spawn_local;
    use tokio::time::sleep;

    struct Harness {
        binder: FieldBinder,
        transport: ScriptedTransport,
        view: RecordingView,
    }

    fn harness(binding: FieldBinding) -> Harness {
        let scheduler = TokioScheduler::shared();
        let transport = ScriptedTransport::default();
        let view = RecordingView::default();
        let indicator = StatusIndicator::new(view.clone(), scheduler.clone(), 2_000);
        let deps = BinderDeps {
            transport: Rc::new(transport.clone()),
            scheduler,
            default_debounce_ms: 500,
        };
        Harness {
            binder: FieldBinder::new(binding, deps, indicator),
            transport,
            view,
        }
    }

    fn text_binding(path: &str, kind: ControlKind) -> FieldBinding {
        FieldBinding::new("admin-field", kind, Endpoint::Admin, path).expect("binding")
    }

    fn text(value: &str) -> ControlValue {
        ControlValue::Text(value.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_posts_nested_body_immediately() {
        run_local(async {
            let binding = FieldBinding::new(
                "auto-expand-reddit",
                ControlKind::Toggle,
                Endpoint::User,
                "autoExpand.reddit",
            )
            .expect("binding");
            let h = harness(binding);
            let outcome = h.binder.on_event(ControlValue::Checked(true)).await;
            assert_eq!(outcome, CommitOutcome::Applied);
            let sent = h.transport.requests();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].request.path, "/settings/user");
            assert_eq!(
                sent[0].request.body,
                Some(json!({"autoExpand": {"reddit": true}}))
            );
            assert_eq!(sent[0].at_ms, 0);
            assert_eq!(
                h.view.states(),
                vec![StatusState::Pending, StatusState::Success]
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_sends_only_the_last_value() {
        run_local(async {
            let h = harness(text_binding("host", ControlKind::Text));
            let mut tasks = Vec::new();
            for value in ["l", "lo", "loc", "localhost"] {
                tasks.push(spawn_local(h.binder.on_event(text(value))));
                sleep(Duration::from_millis(100)).await;
            }
            let mut outcomes = Vec::new();
            for task in tasks {
                outcomes.push(task.await.expect("join"));
            }
            let sent = h.transport.requests();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].request.body, Some(json!({"host": "localhost"})));
            assert_eq!(sent[0].at_ms, 800);
            assert_eq!(
                outcomes,
                vec![
                    CommitOutcome::Superseded,
                    CommitOutcome::Superseded,
                    CommitOutcome::Superseded,
                    CommitOutcome::Applied,
                ]
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn edit_during_flight_cancels_the_older_request() {
        run_local(async {
            let h = harness(text_binding("ollamaURL", ControlKind::Text));
            h.transport.push(Scripted::after(1_000, TransportOutcome::HttpError {
                status: 500,
                message: "stale failure".into(),
            }));
            h.transport.push(Scripted::now(TransportOutcome::Ok));

            let first = spawn_local(h.binder.on_event(text("http://a")));
            sleep(Duration::from_millis(700)).await;
            let second = spawn_local(h.binder.on_event(text("http://b")));

            assert_eq!(first.await.expect("join"), CommitOutcome::Superseded);
            assert_eq!(second.await.expect("join"), CommitOutcome::Applied);
            assert_eq!(h.transport.aborted(), 1);
            let states = h.view.states();
            assert!(!states.iter().any(|s| matches!(s, StatusState::Error(_))));
            assert_eq!(states.last(), Some(&StatusState::Success));
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn skip_empty_leaves_indicator_untouched() {
        run_local(async {
            let binding = text_binding("botToken", ControlKind::Text).with_options(BindingOptions {
                skip_empty: true,
                ..BindingOptions::default()
            });
            let h = harness(binding);
            h.binder.indicator().set_error("previous");
            let before = h.view.states().len();
            let outcome = h.binder.on_event(text("   ")).await;
            assert_eq!(outcome, CommitOutcome::Skipped);
            assert!(h.transport.requests().is_empty());
            assert_eq!(h.view.states().len(), before);
            assert_eq!(h.binder.indicator().last_error().as_deref(), Some("previous"));
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_number_fails_locally() {
        run_local(async {
            let h = harness(text_binding("port", ControlKind::Number));
            let outcome = h.binder.on_event(text("eighty")).await;
            assert_eq!(
                outcome,
                CommitOutcome::Failed(FieldError::Validation("Invalid number".into()))
            );
            assert!(h.transport.requests().is_empty());
            assert_eq!(
                h.view.states(),
                vec![StatusState::Error("Invalid number".into())]
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn valid_number_is_sent_as_integer() {
        run_local(async {
            let h = harness(text_binding("proxyPort", ControlKind::Number));
            assert_eq!(h.binder.on_event(text("8443")).await, CommitOutcome::Applied);
            assert_eq!(
                h.transport.requests()[0].request.body,
                Some(json!({"proxyPort": 8443}))
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn http_errors_render_server_text() {
        run_local(async {
            let h = harness(FieldBinding::new(
                "admin-log-level",
                ControlKind::Select,
                Endpoint::Admin,
                "logLevel",
            )
            .expect("binding"));
            h.transport.push(Scripted::now(TransportOutcome::HttpError {
                status: 400,
                message: "unknown level".into(),
            }));
            let outcome = h.binder.on_event(text("verbose")).await;
            assert!(matches!(outcome, CommitOutcome::Failed(FieldError::Http { status: 400, .. })));
            assert_eq!(
                h.binder.indicator().last_error().as_deref(),
                Some("unknown level")
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn silent_radios_never_touch_the_indicator() {
        run_local(async {
            let binding = FieldBinding::new(
                "guild-fav-channel-1",
                ControlKind::Radio,
                Endpoint::Guild("1".into()),
                "favChannelID",
            )
            .expect("binding")
            .with_options(BindingOptions {
                feedback: Feedback::Silent,
                ..BindingOptions::default()
            });
            let h = harness(binding);
            h.transport.push(Scripted::now(TransportOutcome::NetworkError("offline".into())));
            let outcome = h.binder.on_event(text("42")).await;
            assert_eq!(
                outcome,
                CommitOutcome::Failed(FieldError::Network("offline".into()))
            );
            assert!(h.view.states().is_empty());
            assert_eq!(
                h.transport.requests()[0].request.body,
                Some(json!({"favChannelID": "42"}))
            );
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn success_hook_runs_only_on_success() {
        run_local(async {
            let scheduler = TokioScheduler::shared();
            let transport = ScriptedTransport::default();
            let fired = Rc::new(Cell::new(0));
            let hook: Rc<dyn Fn()> = {
                let fired = fired.clone();
                Rc::new(move || fired.set(fired.get() + 1))
            };
            let binding = text_binding("logLevel", ControlKind::Select).with_options(BindingOptions {
                effect: Some(SuccessEffect::RestartRequired),
                ..BindingOptions::default()
            });
            let binder = FieldBinder::with_success_hook(
                binding,
                BinderDeps {
                    transport: Rc::new(transport.clone()),
                    scheduler: scheduler.clone(),
                    default_debounce_ms: 500,
                },
                StatusIndicator::new(RecordingView::default(), scheduler, 2_000),
                hook,
            );
            transport.push(Scripted::now(TransportOutcome::HttpError {
                status: 403,
                message: "forbidden".into(),
            }));
            binder.on_event(text("debug")).await;
            assert_eq!(fired.get(), 0);
            binder.on_event(text("info")).await;
            assert_eq!(fired.get(), 1);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_immediate_completion_is_ignored() {
        run_local(async {
            let h = harness(FieldBinding::new(
                "guild-1-backup",
                ControlKind::Toggle,
                Endpoint::Guild("1".into()),
                "backupEnabled",
            )
            .expect("binding"));
            h.transport.push(Scripted::after(500, TransportOutcome::HttpError {
                status: 500,
                message: "late".into(),
            }));
            h.transport.push(Scripted::after(100, TransportOutcome::Ok));
            let first = spawn_local(h.binder.on_event(ControlValue::Checked(true)));
            sleep(Duration::from_millis(10)).await;
            let second = spawn_local(h.binder.on_event(ControlValue::Checked(false)));
            assert_eq!(second.await.expect("join"), CommitOutcome::Applied);
            assert_eq!(first.await.expect("join"), CommitOutcome::Superseded);
            assert_eq!(h.transport.aborted(), 0);
            assert_eq!(h.binder.indicator().state(), StatusState::Success);
        })
        .await;
    }
}
