//! Backups listing: fetch once per open and render one display state.
//!
//! # Design
//! - [`BackupsView`] is a single enum, so loading/empty/error/list can never show together.
//! - Re-opening supersedes an older fetch; its result is dropped.
//! - Timestamps are formatted by an injected function (the browser uses the user's locale).

use crate::core::generation::Generation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halsey_api_models::BackupEntry;
use std::rc::Rc;
use tracing::{debug, warn};

/// Fallback for fetch failures that carry no message.
pub const LOAD_FAILED: &str = "Failed to load backups.";
/// Secondary line for guilds that were never backed up.
pub const NO_RUN_YET: &str = "No backup run yet";

/// Formats a completed run as `"{date} {time}"`.
pub type TimestampFormat = Rc<dyn Fn(DateTime<Utc>) -> String>;

/// One rendered row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupRow {
    /// Guild name.
    pub name: String,
    /// Secondary line describing the last run.
    pub detail: String,
    /// Download link; `None` renders a disabled affordance.
    pub download: Option<String>,
}

impl BackupRow {
    /// Build a row from a wire entry.
    #[must_use]
    pub fn from_entry(entry: &BackupEntry, format: &dyn Fn(DateTime<Utc>) -> String) -> Self {
        let (detail, download) = match entry.last_run.as_deref() {
            None => (NO_RUN_YET.to_string(), None),
            Some(raw) => {
                let when = entry.last_run_at().map_or_else(|| raw.to_string(), format);
                (
                    format!("Last backup: {when}"),
                    Some(entry.download_link.clone()),
                )
            }
        };
        Self {
            name: entry.guild_name.clone(),
            detail,
            download,
        }
    }
}

/// What the backups dialog shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackupsView {
    /// Fetch in flight.
    #[default]
    Loading,
    /// No guild has backups configured.
    Empty,
    /// Fetch failed with this message.
    Failed(String),
    /// One row per guild.
    Listed(Vec<BackupRow>),
}

/// `GET /settings/backups`.
#[async_trait(?Send)]
pub trait BackupsApi {
    /// Fetch the listing; errors carry the display message.
    async fn list_backups(&self) -> Result<Vec<BackupEntry>, String>;
}

/// Opens the backups dialog and renders through `sink`.
#[derive(Clone)]
pub struct BackupsBrowser {
    api: Rc<dyn BackupsApi>,
    format: TimestampFormat,
    sink: Rc<dyn Fn(BackupsView)>,
    generation: Generation,
}

impl BackupsBrowser {
    /// Browser rendering every view change into `sink`.
    #[must_use]
    pub fn new(
        api: Rc<dyn BackupsApi>,
        format: TimestampFormat,
        sink: impl Fn(BackupsView) + 'static,
    ) -> Self {
        Self {
            api,
            format,
            sink: Rc::new(sink),
            generation: Generation::new(),
        }
    }

    /// Reset to loading, fetch, and render the result.
    ///
    /// Returns `None` when a newer `open` superseded this one.
    pub async fn open(&self) -> Option<BackupsView> {
        let ticket = self.generation.advance();
        (self.sink)(BackupsView::Loading);
        let fetched = self.api.list_backups().await;
        if ticket.is_cancelled() {
            debug!("stale backups listing dropped");
            return None;
        }
        let view = match fetched {
            Ok(entries) if entries.is_empty() => BackupsView::Empty,
            Ok(entries) => BackupsView::Listed(
                entries
                    .iter()
                    .map(|entry| BackupRow::from_entry(entry, self.format.as_ref()))
                    .collect(),
            ),
            Err(message) => {
                warn!(error = %message, "backups listing failed");
                let message = if message.trim().is_empty() {
                    LOAD_FAILED.to_string()
                } else {
                    message
                };
                BackupsView::Failed(message)
            }
        };
        (self.sink)(view.clone());
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::run_local;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tokio::task::spawn_local;

    struct FakeBackupsApi {
        replies: RefCell<VecDeque<(u64, Result<Vec<BackupEntry>, String>)>>,
    }

    impl FakeBackupsApi {
        fn new(replies: Vec<(u64, Result<Vec<BackupEntry>, String>)>) -> Rc<Self> {
            Rc::new(Self {
                replies: RefCell::new(replies.into()),
            })
        }
    }

    #[async_trait(?Send)]
    impl BackupsApi for FakeBackupsApi {
        async fn list_backups(&self) -> Result<Vec<BackupEntry>, String> {
            let reply = self.replies.borrow_mut().pop_front();
            let (delay, result) = reply.unwrap_or((0, Ok(Vec::new())));
            tokio::time::sleep(Duration::from_millis(delay)).await;
            result
        }
    }

    fn entry(name: &str, last_run: Option<&str>) -> BackupEntry {
        BackupEntry {
            guild_name: name.to_string(),
            last_run: last_run.map(str::to_string),
            download_link: format!("/settings/backups/{name}"),
        }
    }

    fn utc_format() -> TimestampFormat {
        Rc::new(|at: DateTime<Utc>| at.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    fn browser(api: Rc<FakeBackupsApi>) -> (BackupsBrowser, Rc<RefCell<Vec<BackupsView>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            move |view| seen.borrow_mut().push(view)
        };
        (BackupsBrowser::new(api, utc_format(), sink), seen)
    }

    #[tokio::test]
    async fn empty_listing_renders_empty_only() {
        let (browser, seen) = browser(FakeBackupsApi::new(vec![(0, Ok(Vec::new()))]));
        assert_eq!(browser.open().await, Some(BackupsView::Empty));
        assert_eq!(*seen.borrow(), vec![BackupsView::Loading, BackupsView::Empty]);
    }

    #[tokio::test]
    async fn rows_without_a_run_are_disabled() {
        let (browser, _seen) = browser(FakeBackupsApi::new(vec![(
            0,
            Ok(vec![
                entry("alpha", Some("2024-03-01T10:15:00Z")),
                entry("beta", None),
            ]),
        )]));
        let Some(BackupsView::Listed(rows)) = browser.open().await else {
            panic!("expected listing");
        };
        assert_eq!(rows[0].detail, "Last backup: 2024-03-01 10:15:00");
        assert_eq!(rows[0].download.as_deref(), Some("/settings/backups/alpha"));
        assert_eq!(rows[1].detail, NO_RUN_YET);
        assert_eq!(rows[1].download, None);
    }

    #[test]
    fn unparseable_timestamp_is_shown_verbatim() {
        let row = BackupRow::from_entry(&entry("g", Some("yesterday")), utc_format().as_ref());
        assert_eq!(row.detail, "Last backup: yesterday");
        assert!(row.download.is_some());
    }

    #[tokio::test]
    async fn failures_render_error_panel() {
        let (browser, _seen) = browser(FakeBackupsApi::new(vec![
            (0, Err("HTTP 500".to_string())),
            (0, Err(String::new())),
        ]));
        assert_eq!(
            browser.open().await,
            Some(BackupsView::Failed("HTTP 500".into()))
        );
        assert_eq!(
            browser.open().await,
            Some(BackupsView::Failed(LOAD_FAILED.into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_drops_the_older_fetch() {
        run_local(async {
            let (browser, seen) = browser(FakeBackupsApi::new(vec![
                (1_000, Err("slow failure".to_string())),
                (10, Ok(vec![entry("alpha", None)])),
            ]));
            let first = spawn_local({
                let browser = browser.clone();
                async move { browser.open().await }
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
            let second = browser.open().await;
            assert!(matches!(second, Some(BackupsView::Listed(_))));
            assert_eq!(first.await.expect("join"), None);
            assert!(matches!(seen.borrow().last(), Some(BackupsView::Listed(_))));
        })
        .await;
    }
}
