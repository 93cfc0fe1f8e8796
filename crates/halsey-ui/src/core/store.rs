//! Panel-wide yewdux store.
//!
//! # Design
//! - Holds only what the Yew overlays render; the engine keeps its own per-field state.
//! - Small slices with plain reducer methods so they stay testable without a DOM.

use crate::core::backups::BackupsView;
use crate::core::restart::RestartPhase;
use yewdux::store::Store;

/// Global store for the settings panel overlays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct PanelStore {
    /// Page interaction is blocked (restart or stop in progress).
    pub input_blocked: bool,
    /// A saved setting needs a restart; sticky for the page session.
    pub restart_required: bool,
    /// Restart session progress.
    pub restart_phase: RestartPhase,
    /// Restart options dialog.
    pub restart_modal_open: bool,
    /// Backups dialog.
    pub backups: BackupsSlice,
    /// Delete-guild confirmation.
    pub delete_guild: DeleteGuildSlice,
}

/// Backups dialog state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackupsSlice {
    /// Dialog visibility.
    pub open: bool,
    /// What the dialog shows.
    pub view: BackupsView,
}

/// Guild selected for deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuildTarget {
    /// Guild id.
    pub id: String,
    /// Name the user must type.
    pub name: String,
}

/// Delete-guild dialog state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteGuildSlice {
    /// Guild being deleted; `None` closes the dialog.
    pub target: Option<GuildTarget>,
    /// Request in flight.
    pub busy: bool,
    /// Failure shown in the error dialog.
    pub error: Option<String>,
}

impl PanelStore {
    /// Reveal the restart-required notice.
    pub fn flag_restart_required(&mut self) {
        self.restart_required = true;
    }

    /// Show the backups dialog in its loading state.
    pub fn open_backups(&mut self) {
        self.backups = BackupsSlice {
            open: true,
            view: BackupsView::Loading,
        };
    }

    /// Hide the backups dialog.
    pub fn close_backups(&mut self) {
        self.backups.open = false;
    }

    /// Open the delete confirmation for one guild.
    pub fn open_delete_guild(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.delete_guild = DeleteGuildSlice {
            target: Some(GuildTarget {
                id: id.into(),
                name: name.into(),
            }),
            busy: false,
            error: None,
        };
    }

    /// Record a failed deletion; the confirmation stays usable.
    pub fn delete_guild_failed(&mut self, message: impl Into<String>) {
        self.delete_guild.busy = false;
        self.delete_guild.error = Some(message.into());
    }

    /// Close the confirmation and forget the target.
    pub fn close_delete_guild(&mut self) {
        self.delete_guild = DeleteGuildSlice::default();
    }
}
