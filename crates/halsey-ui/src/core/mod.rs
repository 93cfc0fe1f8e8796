//! Core, DOM-free engine for the settings panel.
pub mod backups;
pub mod binder;
pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod field_path;
pub mod generation;
pub mod restart;
pub mod schedule;
pub mod server;
pub mod status;
pub mod store;
pub mod theme;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
