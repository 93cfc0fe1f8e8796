//! DOM resolution of the binding catalog.
//!
//! # Design
//! - Elements are looked up once at boot; each bound control gets one binder and one listener.
//! - A control's indicator is the `.status` element inside its parent.
//! - Missing elements are logged and skipped; the page renders only the sections a user may see.

use crate::core::binder::{BinderDeps, FieldBinder};
use crate::core::binding::{ControlKind, ControlValue, FieldBinding, SuccessEffect};
use crate::core::catalog::{
    CLASS_GROUPS, GUILD_CONTAINER_SELECTOR, guild_bindings, page_bindings,
};
use crate::core::status::{StatusIndicator, StatusState, StatusView};
use gloo::console;
use gloo::dialogs::alert;
use gloo::events::EventListener;
use gloo::utils::document;
use std::rc::Rc;
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Renders indicator states as classes on a `.status` element.
pub(crate) struct DomStatusView {
    element: Option<Element>,
}

impl DomStatusView {
    /// View for the `.status` sibling of `control`.
    pub(crate) fn beside(control: &Element) -> Self {
        let element = control
            .parent_element()
            .and_then(|parent| parent.query_selector(".status").ok().flatten());
        Self { element }
    }

    fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }
}

impl StatusView for DomStatusView {
    fn render(&self, state: &StatusState) {
        let Some(element) = &self.element else {
            return;
        };
        let classes = element.class_list();
        for modifier in StatusState::MODIFIERS {
            classes.remove_1(modifier).ok();
        }
        classes.add_1(state.modifier()).ok();
        if state.is_interactive() {
            classes.add_1("cursor-pointer").ok();
        } else {
            classes.remove_1("cursor-pointer").ok();
        }
    }
}

/// Indicator for `control`, revealing its error message on click.
pub(crate) fn indicator_for(control: &Element, deps: &BinderDeps, decay_ms: u32) -> StatusIndicator {
    let view = DomStatusView::beside(control);
    let status_element = view.element().cloned();
    let indicator = StatusIndicator::new(view, deps.scheduler.clone(), decay_ms);
    if let Some(element) = status_element {
        let indicator = indicator.clone();
        EventListener::new(&element, "click", move |_event| {
            if let Some(message) = indicator.last_error() {
                alert(&message);
            }
        })
        .forget();
    }
    indicator
}

/// Current value of a bound control.
fn read_value(element: &Element, kind: ControlKind) -> Option<ControlValue> {
    if kind.reads_checked() {
        return element
            .dyn_ref::<HtmlInputElement>()
            .map(|input| ControlValue::Checked(input.checked()));
    }
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(ControlValue::Text(select.value()));
    }
    if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        return Some(ControlValue::Text(area.value()));
    }
    element
        .dyn_ref::<HtmlInputElement>()
        .map(|input| ControlValue::Text(input.value()))
}

/// Shared wiring inputs.
#[derive(Clone)]
pub(crate) struct Wiring {
    pub(crate) deps: BinderDeps,
    pub(crate) decay_ms: u32,
    pub(crate) on_restart_required: Rc<dyn Fn()>,
}

fn wire_element(element: Element, binding: FieldBinding, wiring: &Wiring) {
    let indicator = indicator_for(&element, &wiring.deps, wiring.decay_ms);
    let kind = binding.kind;
    let binder = match binding.options.effect {
        Some(SuccessEffect::RestartRequired) => FieldBinder::with_success_hook(
            binding,
            wiring.deps.clone(),
            indicator,
            wiring.on_restart_required.clone(),
        ),
        None => FieldBinder::new(binding, wiring.deps.clone(), indicator),
    };
    let event = if kind.is_debounced() { "input" } else { "change" };
    let target = element.clone();
    EventListener::new(&element, event, move |_event| {
        let Some(value) = read_value(&target, kind) else {
            console::error!("unsupported control element", binder.binding().control.clone());
            return;
        };
        let commit = binder.on_event(value);
        wasm_bindgen_futures::spawn_local(async move {
            commit.await;
        });
    })
    .forget();
}

fn wire_by_id(binding: FieldBinding, wiring: &Wiring) {
    match document().get_element_by_id(&binding.control) {
        Some(element) => wire_element(element, binding, wiring),
        None => debug!(control = %binding.control, "control not on page"),
    }
}

fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        console::error!("selector query failed", selector);
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|idx| nodes.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Resolve every catalog entry present on the page.
pub(crate) fn wire_bindings(wiring: &Wiring) {
    match page_bindings() {
        Ok(bindings) => {
            for binding in bindings {
                wire_by_id(binding, wiring);
            }
        }
        Err(err) => error!(error = %err, "page catalog is invalid"),
    }

    let doc = document();
    for container in query_all(&doc, GUILD_CONTAINER_SELECTOR) {
        let Some(guild_id) = container.get_attribute("data-guild-id") else {
            continue;
        };
        match guild_bindings(&guild_id) {
            Ok(bindings) => {
                for binding in bindings {
                    wire_by_id(binding, wiring);
                }
            }
            Err(err) => error!(guild = %guild_id, error = %err, "guild controls skipped"),
        }
    }

    for group in CLASS_GROUPS {
        for element in query_all(&doc, &format!(".{}", group.class)) {
            let scope_id = element
                .get_attribute(group.scope.id_attribute())
                .unwrap_or_default();
            match group.bind(&scope_id) {
                Ok(binding) => wire_element(element, binding, wiring),
                Err(err) => debug!(class = group.class, error = %err, "group member skipped"),
            }
        }
    }
}

/// Attach `handler` to every element matching `selector`.
pub(crate) fn on_click_all(selector: &str, handler: impl Fn(&Element) + 'static) {
    let handler = Rc::new(handler);
    for element in query_all(&document(), selector) {
        let handler = handler.clone();
        let target = element.clone();
        EventListener::new(&element, "click", move |_event| handler(&target)).forget();
    }
}
