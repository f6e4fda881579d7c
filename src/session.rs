//! Per-session connection state shared with the settings controller.
//!
//! The original host shell kept the current settings blob and the
//! connectivity flag as process-wide globals; here they are explicit fields
//! of a [`SessionContext`] owned by the controller, with documented
//! transitions: the blob is set when the host handshake (or a later settings
//! message) delivers it, and the online flag follows connect/disconnect
//! events from the host channel.

/// Connection-scoped state for one IDE session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Raw settings blob as last received: serialized document text or the
    /// `"defaults"` sentinel. `None` until something arrives.
    settings_blob: Option<String>,

    /// Whether the connection to the backing service is currently up.
    online: bool,
}

impl SessionContext {
    /// A fresh session: offline, no settings blob yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose handshake already delivered a settings blob.
    pub fn with_blob(blob: impl Into<String>, online: bool) -> Self {
        Self {
            settings_blob: Some(blob.into()),
            online,
        }
    }

    /// The current raw blob, if any.
    pub fn blob(&self) -> Option<&str> {
        self.settings_blob.as_deref()
    }

    /// Replace the raw blob.
    pub fn set_blob(&mut self, blob: impl Into<String>) {
        self.settings_blob = Some(blob.into());
    }

    /// Whether the backing service is reachable.
    pub fn online(&self) -> bool {
        self.online
    }

    /// Record that the connection came up.
    pub fn mark_online(&mut self) {
        self.online = true;
    }

    /// Record that the connection went down. The blob is kept: stored
    /// settings remain valid across reconnects.
    pub fn mark_offline(&mut self) {
        self.online = false;
    }
}
