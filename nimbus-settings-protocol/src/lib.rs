//! JSON wire messages for the settings persistence channel.
//!
//! The settings controller talks to the backing service over the host IDE's
//! socket. Outbound frames are [`ClientMessage`] values
//! (`{"command":"settings","action":"get"}` /
//! `{"command":"settings","action":"set","settings":"..."}`); inbound frames
//! routed to the controller are [`HostMessage`] values tagged with `type`.
//!
//! The wire shapes are fixed by the host protocol and covered by tests; do
//! not change field or tag names without a protocol version bump.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel the backing service sends in place of a stored document when the
/// user has never saved settings.
pub const DEFAULTS_SENTINEL: &str = "defaults";

/// Errors produced while encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An inbound frame could not be decoded.
    #[error("malformed host message: {0}")]
    Decode(#[source] serde_json::Error),

    /// An outbound message could not be encoded.
    #[error("message encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A message sent from the IDE client to the backing service.
///
/// Tagged with `command` for host-side dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ClientMessage {
    /// A settings persistence request.
    Settings(SettingsAction),
}

/// The `action` of a settings request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SettingsAction {
    /// Ask the backing service for the current stored settings.
    Get,

    /// Persist the given serialized document text.
    ///
    /// The text is empty when no document has been loaded yet.
    Set {
        /// Serialized settings document.
        settings: String,
    },
}

impl ClientMessage {
    /// Request the currently stored settings.
    pub fn get() -> Self {
        ClientMessage::Settings(SettingsAction::Get)
    }

    /// Persist the given serialized document text.
    pub fn set(settings: impl Into<String>) -> Self {
        ClientMessage::Settings(SettingsAction::Set {
            settings: settings.into(),
        })
    }

    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// A message sent from the backing service to the IDE client.
///
/// Tagged with `type`; only the frames relevant to settings are modeled here,
/// the shell routes everything else elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    /// The stored settings, in answer to a `get` request or pushed on connect.
    Settings {
        /// Serialized document text, the [`DEFAULTS_SENTINEL`], or absent
        /// when nothing is stored. Normalize via [`SettingsPayload::from_wire`].
        #[serde(default)]
        settings: Option<String>,
    },

    /// The connection to the backing service came up.
    Online,

    /// The connection to the backing service went down.
    Offline,
}

impl HostMessage {
    /// Decode from the JSON wire form.
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

/// Normalized form of the inbound `settings` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsPayload {
    /// Nothing stored: absent, empty, or the [`DEFAULTS_SENTINEL`].
    Defaults,

    /// A serialized settings document.
    Document(String),
}

impl SettingsPayload {
    /// Normalize the raw wire field.
    pub fn from_wire(raw: Option<String>) -> Self {
        match raw {
            None => SettingsPayload::Defaults,
            Some(s) if s.is_empty() || s == DEFAULTS_SENTINEL => SettingsPayload::Defaults,
            Some(s) => SettingsPayload::Document(s),
        }
    }
}
