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
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::future_not_send)]
//! Halsey settings panel.
//!
//! Binds the server-rendered settings page to the settings API: every bound
//! control writes its own field, with debounce, stale-request cancellation and
//! a per-field status indicator. Server restarts, stops, guild deletion and the
//! backups listing are driven from the same engine.
//!
//! The [`core`] module is DOM-free and tested natively; the browser glue is
//! only compiled for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
