//! Engine handles shared with the Yew overlays.
//!
//! # Design
//! - Built once at boot; components reach it through a Yew context.
//! - Equality is pointer identity so the provider never triggers re-renders.

use crate::core::backups::BackupsBrowser;
use crate::core::restart::RestartCoordinator;
use crate::core::server::ServerActions;
use std::rc::Rc;

struct Handles {
    restart: RestartCoordinator,
    backups: BackupsBrowser,
    actions: ServerActions,
}

/// Shared engine handles.
#[derive(Clone)]
pub(crate) struct PanelCtx {
    handles: Rc<Handles>,
}

impl PanelCtx {
    pub(crate) fn new(
        restart: RestartCoordinator,
        backups: BackupsBrowser,
        actions: ServerActions,
    ) -> Self {
        Self {
            handles: Rc::new(Handles {
                restart,
                backups,
                actions,
            }),
        }
    }

    pub(crate) fn restart(&self) -> &RestartCoordinator {
        &self.handles.restart
    }

    pub(crate) fn backups(&self) -> &BackupsBrowser {
        &self.handles.backups
    }

    pub(crate) fn actions(&self) -> &ServerActions {
        &self.handles.actions
    }
}

impl PartialEq for PanelCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handles, &other.handles)
    }
}
