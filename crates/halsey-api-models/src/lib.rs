#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::multiple_crate_versions)]
//! Shared HTTP DTOs for the Halsey settings API.
//!
//! Only the payloads with a fixed shape live here. Field writes are free-form
//! `{field: value}` objects assembled by the panel from field paths, so they
//! are not modelled as structs.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Path prefix shared by every settings endpoint.
pub const SETTINGS_PREFIX: &str = "/settings";

/// Body of `POST /settings/restart`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestartRequest {
    /// Re-register slash commands once the process is back up.
    pub register_commands: bool,
    /// Apply a pending update before restarting.
    pub update: bool,
}

/// Response of `GET /settings/restart-status`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestartStatus {
    /// The process has come back up since the restart was requested.
    #[serde(default)]
    pub restarted: bool,
    /// The running version differs from the version recorded before the restart.
    #[serde(default)]
    pub updated: bool,
}

impl RestartStatus {
    /// Whether this status satisfies a restart that asked for an update.
    #[must_use]
    pub const fn honours(&self, update_requested: bool) -> bool {
        self.restarted && (!update_requested || self.updated)
    }
}

/// One row of `GET /settings/backups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    /// Display name of the guild the archive belongs to.
    pub guild_name: String,
    /// Completion time of the most recent backup run, if any.
    ///
    /// The server writes either `null` or an empty string when no run happened.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub last_run: Option<String>,
    /// Relative link serving the latest archive.
    #[serde(default)]
    pub download_link: String,
}

impl BackupEntry {
    /// Parse [`BackupEntry::last_run`] as an RFC 3339 timestamp.
    #[must_use]
    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc))
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}
