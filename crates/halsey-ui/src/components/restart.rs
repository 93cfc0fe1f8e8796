//! Restart options dialog and the page-wide blocking overlay.

use crate::app::context::PanelCtx;
use crate::components::modal::Modal;
use crate::core::restart::{RestartOutcome, RestartPhase};
use crate::core::store::PanelStore;
use gloo::dialogs::alert;
use gloo::utils::window;
use halsey_api_models::RestartRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(RestartModal)]
pub(crate) fn restart_modal() -> Html {
    let open = use_selector(|store: &PanelStore| store.restart_modal_open);
    let ctx = use_context::<PanelCtx>();
    let register_commands = use_state(|| false);
    let update = use_state(|| false);

    {
        let register_commands = register_commands.clone();
        let update = update.clone();
        use_effect_with_deps(
            move |open| {
                if *open {
                    register_commands.set(false);
                    update.set(false);
                }
                || ()
            },
            *open,
        );
    }

    let checkbox = |state: UseStateHandle<bool>| {
        Callback::from(move |event: Event| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                state.set(input.checked());
            }
        })
    };

    let on_close = Callback::from(|()| {
        Dispatch::<PanelStore>::new().reduce_mut(|store| store.restart_modal_open = false);
    });

    let on_cancel = {
        let on_close = on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let on_confirm = {
        let register_commands = *register_commands;
        let update = *update;
        Callback::from(move |_| {
            let Some(ctx) = ctx.clone() else {
                return;
            };
            Dispatch::<PanelStore>::new().reduce_mut(|store| store.restart_modal_open = false);
            let request = RestartRequest {
                register_commands,
                update,
            };
            yew::platform::spawn_local(async move {
                let outcome = ctx.restart().run(request).await;
                if outcome == RestartOutcome::Reload {
                    if let Err(err) = window().location().reload() {
                        gloo::console::error!("page reload failed", err);
                    }
                } else if let Some(message) = outcome.alert() {
                    alert(&message);
                }
            });
        })
    };

    html! {
        <Modal open={*open} on_close={on_close}>
            <div class="space-y-4">
                <div>
                    <h3 class="text-lg font-semibold">{"Restart server"}</h3>
                    <p class="text-sm text-base-content/70">
                        {"The page is locked until the server is back."}
                    </p>
                </div>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        id="restart-register-commands"
                        type="checkbox"
                        class="checkbox checkbox-sm"
                        checked={*register_commands}
                        onchange={checkbox(register_commands.clone())}
                    />
                    <span class="label-text">{"Re-register slash commands"}</span>
                </label>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        id="restart-update"
                        type="checkbox"
                        class="checkbox checkbox-sm"
                        checked={*update}
                        onchange={checkbox(update.clone())}
                    />
                    <span class="label-text">{"Update before restarting"}</span>
                </label>
                <div class="flex justify-end gap-2">
                    <button class="btn btn-ghost btn-sm" onclick={on_cancel}>
                        {"Cancel"}
                    </button>
                    <button class="btn btn-warning btn-sm" onclick={on_confirm}>
                        {"Restart"}
                    </button>
                </div>
            </div>
        </Modal>
    }
}

fn phase_label(phase: RestartPhase) -> &'static str {
    match phase {
        RestartPhase::Restarting => "Restarting server...",
        RestartPhase::Polling => "Waiting for the server to come back...",
        RestartPhase::Reloading => "Reloading...",
        RestartPhase::Idle | RestartPhase::Mismatched | RestartPhase::TimedOut => "Please wait...",
    }
}

/// Swallows every click while the page is blocked.
#[function_component(InputBlocker)]
pub(crate) fn input_blocker() -> Html {
    let blocked = use_selector(|store: &PanelStore| store.input_blocked);
    let phase = use_selector(|store: &PanelStore| store.restart_phase);
    if !*blocked {
        return html! {};
    }
    html! {
        <div
            class="fixed inset-0 z-[1000] flex items-center justify-center bg-base-300/60 cursor-wait"
            role="status"
            aria-live="polite"
        >
            <div class="flex items-center gap-3 rounded-box bg-base-100 px-4 py-3 shadow">
                <span class="loading loading-spinner loading-sm"></span>
                <span class="text-sm">{phase_label(*phase)}</span>
            </div>
        </div>
    }
}
