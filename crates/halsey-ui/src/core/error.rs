//! Error taxonomy for bindings and field writes.
//!
//! # Design
//! - Setup failures (`BindingError`) are caught once, when the catalog is resolved.
//! - Per-attempt failures (`FieldError`) render through the status indicator.
//! - `Cancelled` exists so callers can match it explicitly and stay silent.

use thiserror::Error;

/// Configuration errors detected while building a field binding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    /// Field path split into a segment count other than one or two.
    #[error("field path `{path}` has {segments} segments; expected 1 or 2")]
    PathArity {
        /// Offending path.
        path: String,
        /// Number of segments produced by splitting on `.`.
        segments: usize,
    },
    /// Field path contained an empty segment (for example `a.` or `.b`).
    #[error("field path `{path}` contains an empty segment")]
    EmptySegment {
        /// Offending path.
        path: String,
    },
    /// A scoped endpoint was requested without an identifier.
    #[error("endpoint scope `{scope}` requires a non-empty id")]
    MissingScopeId {
        /// Scope name (guild, channel, member).
        scope: &'static str,
    },
}

/// Failure of a single field write attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// Server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided text, or a synthesized `HTTP {status}` message.
        message: String,
    },
    /// Request never produced a response.
    #[error("{0}")]
    Network(String),
    /// A newer edit superseded this attempt.
    #[error("request superseded")]
    Cancelled,
}
