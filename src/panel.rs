//! Trait seams between the settings controller and the host UI shell.
//!
//! These traits define the interface between the settings subsystem and the
//! shell that owns the windowing system. The shell implements them to
//! provide concrete widgets; the controller only drives lifecycle:
//! show/hide, commit, rollback.

use nimbus_settings_model::SettingsDocument;

/// Command name the shell registers for opening the settings window.
pub const SHOW_SETTINGS_COMMAND: &str = "showsettings";

/// One page of the settings window.
///
/// A page accumulates user edits in an undo log until they are either
/// committed into the settings document or rolled back. Pages with a
/// non-empty undo log form the set of pending edits the controller drains
/// on save.
pub trait SettingsPage {
    /// Stable identifier for diagnostics.
    fn id(&self) -> &str;

    /// Number of uncommitted edits in the page's undo log.
    fn undo_depth(&self) -> usize;

    /// Write all pending edits into the document and clear the undo log.
    fn commit(&mut self, document: &mut SettingsDocument);

    /// Discard all pending edits. Must be a no-op on a clean page.
    fn rollback(&mut self);
}

/// The settings window and its pages, owned by the host shell.
///
/// Implemented by the shell to provide window and toggle-button control to
/// the controller. The shell never mutates persistence state directly; it
/// goes through the controller.
pub trait UiHost {
    /// The pages of the settings window.
    fn pages_mut(&mut self) -> &mut [Box<dyn SettingsPage>];

    /// Show the settings window.
    fn show_window(&mut self);

    /// Hide the settings window.
    fn hide_window(&mut self);

    /// Set the pressed state of the settings toggle button.
    fn set_button_active(&mut self, active: bool);
}

/// Registration descriptor the shell uses to mount the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Display name of the panel.
    pub name: &'static str,
    /// Command routed to [`crate::SettingsController::show_settings`].
    pub command: &'static str,
    /// Hint text for the command palette.
    pub hint: &'static str,
}

/// Descriptor for this extension.
pub fn extension_info() -> ExtensionInfo {
    ExtensionInfo {
        name: "Preferences",
        command: SHOW_SETTINGS_COMMAND,
        hint: "open the settings window",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_info_registers_showsettings() {
        let info = extension_info();
        assert_eq!(info.command, "showsettings");
        assert_eq!(info.name, "Preferences");
    }
}
