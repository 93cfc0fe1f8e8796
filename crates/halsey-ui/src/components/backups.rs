//! Backups dialog.

use crate::components::modal::Modal;
use crate::core::backups::{BackupRow, BackupsView};
use crate::core::store::PanelStore;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

fn row(row: &BackupRow) -> Html {
    let download = match &row.download {
        Some(href) => html! {
            <a class="btn btn-sm btn-primary" href={href.clone()}>{"Download"}</a>
        },
        None => html! {
            <a class="btn btn-sm btn-primary btn-disabled" aria-disabled="true">{"Download"}</a>
        },
    };
    html! {
        <div class="flex items-center justify-between bg-base-200/50 rounded-lg p-3">
            <div class="flex-1">
                <div class="font-medium text-base-content">{row.name.clone()}</div>
                <div class="text-xs text-base-content/50">{row.detail.clone()}</div>
            </div>
            {download}
        </div>
    }
}

#[function_component(BackupsModal)]
pub(crate) fn backups_modal() -> Html {
    let backups = use_selector(|store: &PanelStore| store.backups.clone());
    let on_close = Callback::from(|()| {
        Dispatch::<PanelStore>::new().reduce_mut(PanelStore::close_backups);
    });

    let body = match &backups.view {
        BackupsView::Loading => html! {
            <div class="flex justify-center py-6">
                <span class="loading loading-spinner loading-md"></span>
            </div>
        },
        BackupsView::Empty => html! {
            <p class="text-sm text-base-content/70">{"No backups are configured yet."}</p>
        },
        BackupsView::Failed(message) => html! {
            <div role="alert" class="alert alert-error">
                <span>{message.clone()}</span>
            </div>
        },
        BackupsView::Listed(rows) => html! {
            <div class="space-y-2">
                { for rows.iter().map(row) }
            </div>
        },
    };

    let on_done = {
        let on_close = on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <Modal open={backups.open} on_close={on_close}>
            <div class="space-y-4">
                <h3 class="text-lg font-semibold">{"Backups"}</h3>
                {body}
                <div class="flex justify-end">
                    <button class="btn btn-ghost btn-sm" onclick={on_done}>{"Close"}</button>
                </div>
            </div>
        </Modal>
    }
}
