//! Guild deletion with typed-name confirmation.

use crate::app::context::PanelCtx;
use crate::components::modal::Modal;
use crate::core::server::confirm_enabled;
use crate::core::store::PanelStore;
use gloo::utils::window;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(DeleteGuildModal)]
pub(crate) fn delete_guild_modal() -> Html {
    let slice = use_selector(|store: &PanelStore| store.delete_guild.clone());
    let ctx = use_context::<PanelCtx>();
    let typed = use_state(String::new);

    {
        let typed = typed.clone();
        use_effect_with_deps(
            move |target| {
                if target.is_none() {
                    typed.set(String::new());
                }
                || ()
            },
            slice.target.clone(),
        );
    }

    let Some(target) = slice.target.clone() else {
        return html! {};
    };

    let on_input = {
        let typed = typed.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                typed.set(input.value());
            }
        })
    };

    let on_close = Callback::from(|()| {
        Dispatch::<PanelStore>::new().reduce_mut(PanelStore::close_delete_guild);
    });
    let on_cancel = {
        let on_close = on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let can_confirm = confirm_enabled(&typed, &target.name) && !slice.busy;
    let on_confirm = {
        let id = target.id.clone();
        Callback::from(move |_| {
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let id = id.clone();
            let dispatch = Dispatch::<PanelStore>::new();
            dispatch.reduce_mut(|store| store.delete_guild.busy = true);
            yew::platform::spawn_local(async move {
                match ctx.actions().delete_guild(&id).await {
                    Ok(()) => {
                        if let Err(err) = window().location().reload() {
                            gloo::console::error!("page reload failed", err);
                        }
                    }
                    Err(message) => dispatch.reduce_mut(|store| store.delete_guild_failed(message)),
                }
            });
        })
    };

    let on_dismiss_error = Callback::from(|()| {
        Dispatch::<PanelStore>::new().reduce_mut(|store| store.delete_guild.error = None);
    });
    let on_error_ok = {
        let on_dismiss_error = on_dismiss_error.clone();
        Callback::from(move |_| on_dismiss_error.emit(()))
    };

    html! {
        <>
            <Modal open=true on_close={on_close} locked={slice.busy}>
                <div class="space-y-4">
                    <div>
                        <h3 class="text-lg font-semibold text-error">{"Delete guild"}</h3>
                        <p class="text-sm text-base-content/70">
                            {"This removes every setting stored for "}
                            <span class="font-semibold">{target.name.clone()}</span>
                            {"."}
                        </p>
                    </div>
                    <label class="form-control gap-1">
                        <span class="label-text text-xs">{"Type the guild name to confirm"}</span>
                        <input
                            type="text"
                            class="input input-bordered w-full"
                            placeholder={target.name.clone()}
                            value={(*typed).clone()}
                            oninput={on_input}
                            disabled={slice.busy}
                        />
                    </label>
                    <div class="flex justify-end gap-2">
                        <button class="btn btn-ghost btn-sm" onclick={on_cancel} disabled={slice.busy}>
                            {"Cancel"}
                        </button>
                        <button class="btn btn-error btn-sm" onclick={on_confirm} disabled={!can_confirm}>
                            if slice.busy {
                                <>
                                    <span class="loading loading-spinner loading-sm"></span>
                                    {" Deleting..."}
                                </>
                            } else {
                                {"Delete Guild"}
                            }
                        </button>
                    </div>
                </div>
            </Modal>
            <Modal open={slice.error.is_some()} on_close={on_dismiss_error}>
                <div class="space-y-4">
                    <h3 class="text-lg font-semibold">{"Error"}</h3>
                    <p class="text-sm">{slice.error.clone().unwrap_or_default()}</p>
                    <div class="flex justify-end">
                        <button class="btn btn-sm" onclick={on_error_ok}>{"OK"}</button>
                    </div>
                </div>
            </Modal>
        </>
    }
}
