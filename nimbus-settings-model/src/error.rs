//! Typed error variants for the settings document model.
//!
//! These are exposed at the crate boundary so callers can match on specific
//! failure modes instead of opaque strings. The settings controller above
//! this crate treats parse failures as recoverable (it falls back to the
//! default template); other callers may want to surface them.

use thiserror::Error;

/// Errors produced while parsing, serializing, or navigating a
/// [`SettingsDocument`](crate::SettingsDocument).
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The persisted document text could not be parsed.
    #[error("settings document parse failed: {0}")]
    Parse(#[source] serde_json::Error),

    /// The in-memory document could not be serialized to text.
    #[error("settings document serialize failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The parsed document's root section has an unexpected tag.
    #[error("unexpected root section '{0}' (expected 'settings')")]
    UnexpectedRoot(String),

    /// A slash path did not resolve to an existing section.
    #[error("no section at path '{0}'")]
    MissingSection(String),
}
