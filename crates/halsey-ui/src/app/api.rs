//! HTTP client for the settings API.
//!
//! # Design
//! - Create exactly one client per page boot and share it behind `Rc`.
//! - Superseded writes are torn down through an `AbortController` registered on the ticket.
//! - Responses are classified by the core so every caller reports failures alike.

use crate::core::backups::BackupsApi;
use crate::core::config::PanelConfig;
use crate::core::generation::Ticket;
use crate::core::restart::{RestartApi, restart_change};
use crate::core::transport::{ChangeRequest, Method, Transport, TransportOutcome};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use gloo_net::http::Request;
use halsey_api_models::{BackupEntry, RestartRequest, RestartStatus, SETTINGS_PREFIX};
use web_sys::AbortController;

/// Same-origin settings API client.
#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    config: PanelConfig,
}

impl HttpClient {
    pub(crate) const fn new(config: PanelConfig) -> Self {
        Self { config }
    }

    fn build(&self, request: &ChangeRequest) -> Result<Request, gloo_net::Error> {
        let url = self.config.url(&request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Delete => Request::delete(&url),
        };
        match &request.body {
            Some(body) => builder.json(body),
            None => Ok(builder),
        }
    }

    async fn fetch_backups(&self) -> Result<Vec<BackupEntry>> {
        let response = Request::get(&self.config.url(&format!("{SETTINGS_PREFIX}/backups")))
            .send()
            .await?;
        if !response.ok() {
            return Err(anyhow!("HTTP {}", response.status()));
        }
        let entries = response.json::<Option<Vec<BackupEntry>>>().await?;
        Ok(entries.unwrap_or_default())
    }

    async fn fetch_restart_status(&self, cache_bust: u64) -> Result<RestartStatus> {
        let url = self
            .config
            .url(&format!("{SETTINGS_PREFIX}/restart-status?t={cache_bust}"));
        let response = Request::get(&url).send().await?;
        Ok(response.json::<RestartStatus>().await?)
    }
}

fn is_abort(err: &gloo_net::Error) -> bool {
    matches!(err, gloo_net::Error::JsError(js) if js.name == "AbortError")
}

#[async_trait(?Send)]
impl Transport for HttpClient {
    async fn send(&self, request: ChangeRequest, signal: Ticket) -> TransportOutcome {
        let built = match self.build(&request) {
            Ok(built) => built,
            Err(err) => return TransportOutcome::NetworkError(err.to_string()),
        };
        let controller = AbortController::new().ok();
        if let Some(controller) = &controller {
            let controller = controller.clone();
            signal.on_cancel(move || controller.abort());
        }
        let abort = controller.as_ref().map(AbortController::signal);
        match built.abort_signal(abort.as_ref()).send().await {
            Ok(response) => {
                let status = response.status();
                let body = if response.ok() {
                    String::new()
                } else {
                    response.text().await.unwrap_or_default()
                };
                TransportOutcome::from_response(status, &body)
            }
            Err(err) if is_abort(&err) => TransportOutcome::Cancelled,
            Err(err) => TransportOutcome::NetworkError(err.to_string()),
        }
    }
}

#[async_trait(?Send)]
impl RestartApi for HttpClient {
    async fn request_restart(&self, request: RestartRequest) -> TransportOutcome {
        match restart_change(request) {
            Ok(change) => Transport::send(self, change, Ticket::detached()).await,
            Err(err) => TransportOutcome::NetworkError(err.to_string()),
        }
    }

    async fn restart_status(&self, cache_bust: u64) -> Result<RestartStatus, String> {
        self.fetch_restart_status(cache_bust)
            .await
            .map_err(|err| err.to_string())
    }
}

#[async_trait(?Send)]
impl BackupsApi for HttpClient {
    async fn list_backups(&self) -> Result<Vec<BackupEntry>, String> {
        self.fetch_backups().await.map_err(|err| err.to_string())
    }
}
