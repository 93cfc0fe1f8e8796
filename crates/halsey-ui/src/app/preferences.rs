//! Persistence and environment helpers for the panel.

use crate::core::config::PanelConfig;
use crate::core::theme::{THEME_KEY, ThemeMode};
use gloo::console;
use gloo::events::EventListener;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::{document, document_element, window};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Configuration for this page: origin plus the optional `data-log-level` override.
pub(crate) fn load_config() -> PanelConfig {
    let origin = window().location().origin().unwrap_or_default();
    let level = document_element().get_attribute("data-log-level");
    PanelConfig::from_page(&origin, level.as_deref())
}

fn prefers_dark() -> bool {
    window()
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

pub(crate) fn load_theme() -> ThemeMode {
    let stored = LocalStorage::get::<String>(THEME_KEY).ok();
    ThemeMode::resolve(stored.as_deref(), prefers_dark())
}

/// Write the theme to `data-theme`, persist it and sync the toggle.
pub(crate) fn apply_theme(theme: ThemeMode) {
    if let Err(err) = document_element().set_attribute("data-theme", theme.as_str()) {
        console::error!("theme attribute update failed", err);
    }
    if let Err(err) = LocalStorage::set(THEME_KEY, theme.as_str()) {
        console::error!("storage operation failed", "set", THEME_KEY, err.to_string());
    }
    if let Some(toggle) = theme_toggle() {
        toggle.set_checked(theme.is_dark());
    }
}

fn theme_toggle() -> Option<HtmlInputElement> {
    document()
        .get_element_by_id(THEME_TOGGLE_ID)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
}

/// Flip the theme whenever the toggle changes.
pub(crate) fn wire_theme_toggle() {
    let Some(toggle) = theme_toggle() else {
        return;
    };
    EventListener::new(&toggle, "change", |_event| {
        apply_theme(load_theme().toggled());
    })
    .forget();
}
