//! Browser entrypoint: binds the server-rendered page and mounts the overlays.
//!
//! # Design
//! - Boot runs once; every listener lives for the page session and is `forget`-ed.
//! - One HTTP client, one scheduler and one input block are shared by every feature.
//! - Engine state reaches the Yew overlays only through the yewdux store and [`PanelCtx`].

mod api;
pub(crate) mod context;
mod dom;
mod preferences;
mod telemetry;
mod timers;

use crate::components::{PanelRoot, PanelRootProps};
use crate::core::backups::{BackupsBrowser, BackupsView, TimestampFormat};
use crate::core::binder::BinderDeps;
use crate::core::restart::{InputBlock, RestartCoordinator};
use crate::core::schedule::SharedScheduler;
use crate::core::server::{STOP_CONFIRM, ServerActions};
use crate::core::store::PanelStore;
use crate::core::transport::Transport;
use api::HttpClient;
use chrono::{DateTime, Utc};
use context::PanelCtx;
use dom::{Wiring, indicator_for, on_click_all};
use gloo::console;
use gloo::dialogs::{alert, confirm};
use gloo::utils::{body, document};
use std::rc::Rc;
use timers::BrowserScheduler;
use tracing::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlButtonElement};
use yewdux::prelude::Dispatch;

const OVERLAY_ROOT_ID: &str = "halsey-overlays";
const RESTART_NOTICE_ID: &str = "restart-required-notice";
const UPDATE_YT_DLP_ID: &str = "admin-update-yt-dlp";

/// Boot the settings panel on the current page.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let config = preferences::load_config();
    if let Err(err) = telemetry::init_logging(&config.log_level) {
        console::error!("logging setup failed", err.to_string());
    }

    preferences::apply_theme(preferences::load_theme());
    preferences::wire_theme_toggle();

    let client = Rc::new(HttpClient::new(config.clone()));
    let scheduler: SharedScheduler = Rc::new(BrowserScheduler);
    let dispatch = Dispatch::<PanelStore>::new();

    let block = InputBlock::new();
    {
        let dispatch = dispatch.clone();
        block.subscribe(move |held| dispatch.reduce_mut(|store| store.input_blocked = held));
    }

    let restart = {
        let dispatch = dispatch.clone();
        RestartCoordinator::new(client.clone(), scheduler.clone(), block.clone(), config.timings)
            .with_phase_observer(move |phase| {
                dispatch.reduce_mut(|store| store.restart_phase = phase);
            })
    };
    let backups = {
        let dispatch = dispatch.clone();
        BackupsBrowser::new(client.clone(), locale_format(), move |view: BackupsView| {
            dispatch.reduce_mut(|store| store.backups.view = view);
        })
    };
    let transport: Rc<dyn Transport> = client;
    let actions = ServerActions::new(transport.clone(), block);

    let wiring = Wiring {
        deps: BinderDeps {
            transport,
            scheduler,
            default_debounce_ms: config.timings.debounce_ms,
        },
        decay_ms: config.timings.success_decay_ms,
        on_restart_required: Rc::new(reveal_restart_notice),
    };
    dom::wire_bindings(&wiring);

    let ctx = PanelCtx::new(restart, backups, actions);
    wire_actions(&ctx, &wiring);
    mount_overlays(ctx);
    info!(base_url = %config.base_url, "settings panel ready");
}

/// `Last backup` timestamps in the browser's locale.
fn locale_format() -> TimestampFormat {
    Rc::new(|at: DateTime<Utc>| {
        let date = js_sys::Date::new(&JsValue::from_str(&at.to_rfc3339()));
        let day = String::from(date.to_locale_date_string("default", &JsValue::UNDEFINED));
        let time = String::from(date.to_locale_time_string("default"));
        format!("{day} {time}")
    })
}

fn reveal_restart_notice() {
    Dispatch::<PanelStore>::new().reduce_mut(PanelStore::flag_restart_required);
    if let Some(notice) = document().get_element_by_id(RESTART_NOTICE_ID) {
        notice.class_list().remove_1("hidden").ok();
    }
}

fn wire_actions(ctx: &PanelCtx, wiring: &Wiring) {
    on_click_all("[data-action=\"restart-server\"]", |_button| {
        Dispatch::<PanelStore>::new().reduce_mut(|store| store.restart_modal_open = true);
    });

    {
        let ctx = ctx.clone();
        on_click_all("[data-action=\"open-backups\"]", move |_button| {
            Dispatch::<PanelStore>::new().reduce_mut(PanelStore::open_backups);
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                ctx.backups().open().await;
            });
        });
    }

    {
        let ctx = ctx.clone();
        on_click_all("[data-action=\"stop-server\"]", move |_button| {
            if !confirm(STOP_CONFIRM) {
                return;
            }
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(message) = ctx.actions().stop().await.alert() {
                    alert(&message);
                }
            });
        });
    }

    on_click_all(".delete-guild-btn", |button| {
        let id = button.get_attribute("data-guild-id").unwrap_or_default();
        let name = button.get_attribute("data-guild-name").unwrap_or_default();
        Dispatch::<PanelStore>::new().reduce_mut(|store| store.open_delete_guild(id, name));
    });

    if let Some(button) = document().get_element_by_id(UPDATE_YT_DLP_ID) {
        wire_yt_dlp_update(ctx, wiring, &button);
    }
}

fn wire_yt_dlp_update(ctx: &PanelCtx, wiring: &Wiring, button: &Element) {
    let Some(button) = button.dyn_ref::<HtmlButtonElement>().cloned() else {
        console::error!("update control is not a button", UPDATE_YT_DLP_ID);
        return;
    };
    let indicator = indicator_for(&button, &wiring.deps, wiring.decay_ms);
    let ctx = ctx.clone();
    on_click_all(&format!("#{UPDATE_YT_DLP_ID}"), move |_target| {
        let ctx = ctx.clone();
        let indicator = indicator.clone();
        let button = button.clone();
        button.set_disabled(true);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = ctx.actions().update_yt_dlp(&indicator).await {
                debug!(error = %err, "yt-dlp update ended with an error");
            }
            button.set_disabled(false);
        });
    });
}

fn mount_overlays(ctx: PanelCtx) {
    let host = match document().create_element("div") {
        Ok(host) => host,
        Err(err) => {
            console::error!("overlay host creation failed", err);
            return;
        }
    };
    host.set_id(OVERLAY_ROOT_ID);
    if let Err(err) = body().append_child(&host) {
        console::error!("overlay host mount failed", err);
        return;
    }
    yew::Renderer::<PanelRoot>::with_root_and_props(host, PanelRootProps { ctx }).render();
}
