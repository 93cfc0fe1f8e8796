//! Typed descriptors for bound form controls.
//!
//! # Design
//! - A binding is resolved once at start-up and never mutated afterwards.
//! - Control families decide commit timing; options only refine behaviour.
//! - Values are coerced here so the binder never inspects DOM types.

use crate::core::error::{BindingError, FieldError};
use crate::core::field_path::FieldPath;
use crate::core::transport::Endpoint;
use serde_json::Value;

/// Control family of a bound element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Switch-style checkbox.
    Toggle,
    /// Drop-down.
    Select,
    /// Plain checkbox.
    Checkbox,
    /// Radio button; the value is the button's `value` attribute.
    Radio,
    /// Free text (URLs, secrets, prompts).
    Text,
    /// Integer input.
    Number,
}

impl ControlKind {
    /// Text-like controls wait for input to settle before writing.
    #[must_use]
    pub const fn is_debounced(self) -> bool {
        matches!(self, Self::Text | Self::Number)
    }

    /// Checkbox-like controls report their checked state.
    #[must_use]
    pub const fn reads_checked(self) -> bool {
        matches!(self, Self::Toggle | Self::Checkbox)
    }
}

/// Raw value read from a control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlValue {
    /// Checked state of a toggle/checkbox.
    Checked(bool),
    /// Textual value of any other control.
    Text(String),
}

impl ControlValue {
    /// Whether the value is blank once trimmed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Checked(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

/// How a binding reports outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Feedback {
    /// Drive the field's status indicator.
    #[default]
    Indicator,
    /// Log failures only; used for low-stakes radio preferences.
    Silent,
}

/// Cross-cutting effect fired after a genuine success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuccessEffect {
    /// The change only applies after a server restart.
    RestartRequired,
}

/// Optional behaviour attached to a binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Ignore blank input instead of writing an empty string.
    pub skip_empty: bool,
    /// Debounce override; falls back to the panel default.
    pub debounce_ms: Option<u32>,
    /// Reporting mode.
    pub feedback: Feedback,
    /// Effect fired on success.
    pub effect: Option<SuccessEffect>,
}

/// Association between one control and one remote field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldBinding {
    /// DOM id of the control (or a synthetic key for class-group members).
    pub control: String,
    /// Control family.
    pub kind: ControlKind,
    /// Target endpoint.
    pub endpoint: Endpoint,
    /// Where the value lands in the request body.
    pub path: FieldPath,
    /// Behaviour refinements.
    pub options: BindingOptions,
}

impl FieldBinding {
    /// Build a binding, validating the field path.
    ///
    /// # Errors
    /// Returns a [`BindingError`] when `path` is not a one- or two-segment path.
    pub fn new(
        control: impl Into<String>,
        kind: ControlKind,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<Self, BindingError> {
        Ok(Self {
            control: control.into(),
            kind,
            endpoint,
            path: FieldPath::parse(path)?,
            options: BindingOptions::default(),
        })
    }

    /// Replace the options wholesale.
    #[must_use]
    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Effective debounce interval.
    #[must_use]
    pub fn debounce_ms(&self, default_ms: u32) -> u32 {
        self.options.debounce_ms.unwrap_or(default_ms)
    }

    /// Convert a raw control value into the JSON value sent to the server.
    ///
    /// # Errors
    /// Returns [`FieldError::Validation`] when a number field holds non-integer text.
    pub fn coerce(&self, value: ControlValue) -> Result<Value, FieldError> {
        match (self.kind, value) {
            (ControlKind::Number, ControlValue::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FieldError::Validation("Invalid number".to_string())),
            (_, ControlValue::Checked(checked)) => Ok(Value::Bool(checked)),
            (_, ControlValue::Text(text)) => Ok(Value::String(text)),
        }
    }
}
