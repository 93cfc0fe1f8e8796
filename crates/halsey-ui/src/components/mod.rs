//! Yew overlays mounted beside the server-rendered settings page.

pub(crate) mod backups;
pub(crate) mod delete_guild;
pub(crate) mod modal;
pub(crate) mod restart;

use crate::app::context::PanelCtx;
use backups::BackupsModal;
use delete_guild::DeleteGuildModal;
use restart::{InputBlocker, RestartModal};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PanelRootProps {
    pub(crate) ctx: PanelCtx,
}

/// Hosts every overlay under one shared context.
#[function_component(PanelRoot)]
pub(crate) fn panel_root(props: &PanelRootProps) -> Html {
    html! {
        <ContextProvider<PanelCtx> context={props.ctx.clone()}>
            <RestartModal />
            <BackupsModal />
            <DeleteGuildModal />
            <InputBlocker />
        </ContextProvider<PanelCtx>>
    }
}
