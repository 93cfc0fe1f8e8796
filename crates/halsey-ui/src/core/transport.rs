//! Change transport contract and outcome classification.
//!
//! # Design
//! - A write is one request carrying an optional JSON body.
//! - Outcomes are a closed, tagged set; cancellation is distinct from network failure.
//! - Classification of status/body pairs lives here so every caller agrees on messages.

use crate::core::error::{BindingError, FieldError};
use crate::core::generation::Ticket;
use async_trait::async_trait;
use halsey_api_models::SETTINGS_PREFIX;
use serde_json::Value;
use std::fmt;

/// HTTP verb used for a settings write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Read-only action endpoints.
    Get,
    /// Field writes and server actions.
    Post,
    /// Resource removal.
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Settings endpoint a binding writes to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Current user's preferences.
    User,
    /// Server-wide admin settings.
    Admin,
    /// One guild.
    Guild(String),
    /// One channel.
    Channel(String),
    /// Another user's permissions (admin only).
    Member(String),
}

impl Endpoint {
    /// Build a scoped endpoint, rejecting blank ids.
    ///
    /// # Errors
    /// Returns [`BindingError::MissingScopeId`] when `id` is blank.
    pub fn scoped(
        build: fn(String) -> Self,
        scope: &'static str,
        id: &str,
    ) -> Result<Self, BindingError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BindingError::MissingScopeId { scope });
        }
        Ok(build(id.to_string()))
    }

    /// Request path relative to the panel origin.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::User => format!("{SETTINGS_PREFIX}/user"),
            Self::Admin => format!("{SETTINGS_PREFIX}/admin"),
            Self::Guild(id) => format!("{SETTINGS_PREFIX}/guild/{}", urlencoding::encode(id)),
            Self::Channel(id) => format!("{SETTINGS_PREFIX}/channel/{}", urlencoding::encode(id)),
            Self::Member(id) => format!("{SETTINGS_PREFIX}/user/{}", urlencoding::encode(id)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// One outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the panel origin.
    pub path: String,
    /// JSON body, when the verb carries one.
    pub body: Option<Value>,
}

impl ChangeRequest {
    /// `POST` a JSON body to `endpoint`.
    #[must_use]
    pub fn post(endpoint: &Endpoint, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: endpoint.path(),
            body: Some(body),
        }
    }

    /// `DELETE` the resource at `endpoint`.
    #[must_use]
    pub fn delete(endpoint: &Endpoint) -> Self {
        Self {
            method: Method::Delete,
            path: endpoint.path(),
            body: None,
        }
    }

    /// Body-less request to an arbitrary settings path.
    #[must_use]
    pub fn action(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }
}

/// Result of one transport call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportOutcome {
    /// 2xx response.
    Ok,
    /// Non-2xx response with the message to show.
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Response text, or `HTTP {status}` when the body was empty.
        message: String,
    },
    /// Fetch-level failure.
    NetworkError(String),
    /// Superseded by a newer request.
    Cancelled,
}

impl TransportOutcome {
    /// Classify a completed response.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        if (200..300).contains(&status) {
            return Self::Ok;
        }
        Self::HttpError {
            status,
            message: http_message(status, body),
        }
    }

    /// Collapse into the shared error taxonomy.
    ///
    /// # Errors
    /// Returns the matching [`FieldError`] for every non-`Ok` outcome.
    pub fn into_result(self) -> Result<(), FieldError> {
        match self {
            Self::Ok => Ok(()),
            Self::HttpError { status, message } => Err(FieldError::Http { status, message }),
            Self::NetworkError(reason) => Err(FieldError::Network(reason)),
            Self::Cancelled => Err(FieldError::Cancelled),
        }
    }
}

/// Message for a non-2xx response: trimmed body text, else `HTTP {status}`.
#[must_use]
pub fn http_message(status: u16, body: &str) -> String {
    let text = body.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}

/// Performs settings writes.
#[async_trait(?Send)]
pub trait Transport {
    /// Send `request`; the ticket is the cooperative cancellation signal.
    async fn send(&self, request: ChangeRequest, signal: Ticket) -> TransportOutcome;
}
