//! Server-level actions: stop, one-shot tool update, guild deletion.
//!
//! # Design
//! - Each action is one request; none of them debounce or retry.
//! - Stop shares the restart input block so the two can never overlap.

use crate::core::error::FieldError;
use crate::core::generation::Ticket;
use crate::core::restart::InputBlock;
use crate::core::status::StatusIndicator;
use crate::core::transport::{ChangeRequest, Endpoint, Method, Transport};
use halsey_api_models::SETTINGS_PREFIX;
use std::rc::Rc;
use tracing::{info, warn};

/// Confirmation shown before stopping.
pub const STOP_CONFIRM: &str =
    "Are you sure you want to stop the server? You will lose access to this page.";
/// Message shown once the server accepted the stop.
pub const STOP_ACCEPTED: &str = "Server is shutting down...";
/// Message used when the stop request is refused.
pub const STOP_REFUSED: &str = "Failed to stop server";
/// Fallback shown when a guild deletion fails without a message.
pub const DELETE_GUILD_FAILED: &str = "Failed to delete guild.";

/// Result of a stop attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    /// The server is going away; the page stays blocked.
    ShuttingDown,
    /// The stop failed; the page is usable again.
    Failed(String),
    /// A restart session holds the input block.
    Busy,
}

impl StopOutcome {
    /// Alert text for this outcome.
    #[must_use]
    pub fn alert(&self) -> Option<String> {
        match self {
            Self::ShuttingDown => Some(STOP_ACCEPTED.to_string()),
            Self::Failed(message) => Some(format!("Error: {message}")),
            Self::Busy => None,
        }
    }
}

/// Stop, update and delete actions against the settings API.
#[derive(Clone)]
pub struct ServerActions {
    transport: Rc<dyn Transport>,
    block: InputBlock,
}

impl ServerActions {
    /// Actions sharing `block` with the restart coordinator.
    #[must_use]
    pub fn new(transport: Rc<dyn Transport>, block: InputBlock) -> Self {
        Self { transport, block }
    }

    /// `POST /settings/stop` under the input block.
    pub async fn stop(&self) -> StopOutcome {
        let Some(guard) = self.block.acquire() else {
            return StopOutcome::Busy;
        };
        let request = ChangeRequest::action(Method::Post, format!("{SETTINGS_PREFIX}/stop"));
        match self.transport.send(request, Ticket::detached()).await.into_result() {
            Ok(()) => {
                info!("server stop accepted");
                guard.retain();
                StopOutcome::ShuttingDown
            }
            Err(err) => {
                let message = match err {
                    FieldError::Network(reason) => reason,
                    _ => STOP_REFUSED.to_string(),
                };
                warn!(error = %message, "server stop failed");
                drop(guard);
                StopOutcome::Failed(message)
            }
        }
    }

    /// `GET /settings/update-yt-dlp`, reported through `indicator`.
    ///
    /// # Errors
    /// Returns the [`FieldError`] the indicator now shows.
    pub async fn update_yt_dlp(&self, indicator: &StatusIndicator) -> Result<(), FieldError> {
        indicator.set_pending();
        let request = ChangeRequest::action(Method::Get, format!("{SETTINGS_PREFIX}/update-yt-dlp"));
        let result = self
            .transport
            .send(request, Ticket::detached())
            .await
            .into_result();
        match &result {
            Ok(()) => indicator.set_success(),
            Err(err) => {
                warn!(error = %err, "yt-dlp update failed");
                indicator.set_error(err.to_string());
            }
        }
        result
    }

    /// `DELETE /settings/guild/{guild_id}`.
    ///
    /// # Errors
    /// Returns the message for the error modal.
    pub async fn delete_guild(&self, guild_id: &str) -> Result<(), String> {
        let endpoint = Endpoint::scoped(Endpoint::Guild, "guild", guild_id)
            .map_err(|err| err.to_string())?;
        let outcome = self
            .transport
            .send(ChangeRequest::delete(&endpoint), Ticket::detached())
            .await;
        outcome.into_result().map_err(|err| {
            let message = err.to_string();
            warn!(guild = guild_id, error = %message, "guild deletion failed");
            if message.trim().is_empty() {
                DELETE_GUILD_FAILED.to_string()
            } else {
                message
            }
        })
    }
}

/// Confirm is enabled only when the typed text is exactly the guild name.
#[must_use]
pub fn confirm_enabled(typed: &str, guild_name: &str) -> bool {
    !guild_name.is_empty() && typed == guild_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::StatusState;
    use crate::core::testing::{
        RecordingView, Scripted, ScriptedTransport, TokioScheduler, run_local,
    };
    use crate::core::transport::TransportOutcome;

    fn actions() -> (ServerActions, ScriptedTransport, InputBlock) {
        let transport = ScriptedTransport::default();
        let block = InputBlock::new();
        (
            ServerActions::new(Rc::new(transport.clone()), block.clone()),
            transport,
            block,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_stop_keeps_page_blocked() {
        let (actions, transport, block) = actions();
        assert_eq!(actions.stop().await, StopOutcome::ShuttingDown);
        assert!(block.is_held());
        let sent = transport.requests();
        assert_eq!(sent[0].request.method, Method::Post);
        assert_eq!(sent[0].request.path, "/settings/stop");
    }

    #[tokio::test(start_paused = true)]
    async fn refused_stop_unblocks() {
        let (actions, transport, block) = actions();
        transport.push(Scripted::now(TransportOutcome::from_response(500, "")));
        let outcome = actions.stop().await;
        assert_eq!(outcome, StopOutcome::Failed(STOP_REFUSED.to_string()));
        assert_eq!(outcome.alert().as_deref(), Some("Error: Failed to stop server"));
        assert!(!block.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_server_stop_reports_reason_and_unblocks() {
        let (actions, transport, block) = actions();
        transport.push(Scripted::now(TransportOutcome::NetworkError(
            "Failed to fetch".into(),
        )));
        let outcome = actions.stop().await;
        assert_eq!(outcome, StopOutcome::Failed("Failed to fetch".to_string()));
        assert_eq!(outcome.alert().as_deref(), Some("Error: Failed to fetch"));
        assert!(!block.is_held());
        assert!(block.acquire().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_refused_during_restart() {
        let (actions, transport, block) = actions();
        let _restart = block.acquire().expect("free block");
        assert_eq!(actions.stop().await, StopOutcome::Busy);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn yt_dlp_update_drives_indicator() {
        run_local(async {
            let (actions, transport, _block) = actions();
            let view = RecordingView::default();
            let indicator = StatusIndicator::new(view.clone(), TokioScheduler::shared(), 2_000);
            transport.push(Scripted::now(TransportOutcome::from_response(503, "")));
            let result = actions.update_yt_dlp(&indicator).await;
            assert_eq!(
                result,
                Err(FieldError::Http {
                    status: 503,
                    message: "HTTP 503".into()
                })
            );
            assert!(actions.update_yt_dlp(&indicator).await.is_ok());
            assert_eq!(
                view.states(),
                vec![
                    StatusState::Pending,
                    StatusState::Error("HTTP 503".into()),
                    StatusState::Pending,
                    StatusState::Success,
                ]
            );
            assert_eq!(transport.requests()[0].request.method, Method::Get);
            assert_eq!(transport.requests()[0].request.path, "/settings/update-yt-dlp");
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn delete_guild_sends_delete_and_reports_text() {
        let (actions, transport, _block) = actions();
        assert_eq!(actions.delete_guild("77").await, Ok(()));
        transport.push(Scripted::now(TransportOutcome::from_response(
            409,
            "guild is busy",
        )));
        assert_eq!(
            actions.delete_guild("77").await,
            Err("guild is busy".to_string())
        );
        let sent = transport.requests();
        assert_eq!(sent[0].request.method, Method::Delete);
        assert_eq!(sent[0].request.path, "/settings/guild/77");
        assert!(sent[0].request.body.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_guild_rejects_blank_id() {
        let (actions, transport, _block) = actions();
        assert!(actions.delete_guild(" ").await.is_err());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn confirm_requires_exact_name() {
        assert!(confirm_enabled("My Guild", "My Guild"));
        assert!(!confirm_enabled("my guild", "My Guild"));
        assert!(!confirm_enabled("My Guild ", "My Guild"));
        assert!(!confirm_enabled("", ""));
    }
}
